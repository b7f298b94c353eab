//! Tree Configuration
//!
//! Settings for growing a decision tree, with JSON load and save.
use crate::constants::MAX_DEPTH_LIMIT;
use crate::errors::TreeError;
use crate::utils::validate_usize_parameter;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_parallel() -> bool {
    false
}
fn default_num_threads() -> Option<usize> {
    None
}

/// Configuration for a [`crate::DecisionTree`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree. A depth of 0 yields a single majority-vote leaf.
    pub max_depth: usize,
    /// Grow sibling subtrees and predict rows on a thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Number of threads for parallel tasks. `None` lets rayon decide.
    #[serde(default = "default_num_threads")]
    pub num_threads: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            max_depth: 3,
            parallel: false,
            num_threads: None,
        }
    }
}

impl TreeConfig {
    /// Set the maximum depth.
    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set whether training and batch prediction run in parallel.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of threads used when running in parallel.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        validate_usize_parameter(self.max_depth, 0, MAX_DEPTH_LIMIT, "max_depth")?;
        if let Some(n) = self.num_threads {
            validate_usize_parameter(n, 1, usize::MAX, "num_threads")?;
        }
        Ok(())
    }
}

/// IO
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_config<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeError> {
        fs::write(path, self.json_dump()?).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, TreeError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load_config<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let json_str = fs::read_to_string(path).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ConfigIO for TreeConfig {}
