//! Errors
//!
//! Custom error types used throughout the `infotree` crate.
use thiserror::Error;

/// Errors that can occur while loading data, growing a tree or scoring it.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Malformed or inconsistent tabular input. First value names the source.
    #[error("Invalid input in {0}: {1}")]
    Format(String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    Config(String, String, String),
    /// An example carried a value for the split attribute that no training row had.
    /// `value` is `None` when the attribute was absent from the example altogether.
    #[error("Value {value:?} for attribute {attribute} was not seen during training.")]
    UnseenValue { attribute: String, value: Option<String> },
    /// A metric was requested over zero rows.
    #[error("Cannot compute {0} over an empty set of labels.")]
    EmptyInput(String),
    /// Predicted and true labels have different lengths.
    #[error("Length mismatch: {0} predictions for {1} labels.")]
    LengthMismatch(usize, usize),
    /// The tree was queried before `fit` was called.
    #[error("The decision tree has not been fitted yet.")]
    NotFitted,
    /// Unable to read from a file.
    #[error("Unable to read from a file {0}")]
    UnableToRead(String),
    /// Unable to write to a file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
}
