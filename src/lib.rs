mod node;

// Modules
pub mod config;
pub mod constants;
pub mod data;
pub mod driver;
pub mod errors;
pub mod histogram;
pub mod metric;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use config::{ConfigIO, TreeConfig};
pub use data::{AttributeSource, Dataset};
pub use errors::TreeError;
pub use node::{Branch, Node};
pub use tree::DecisionTree;
