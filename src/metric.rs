use crate::errors::TreeError;
use crate::histogram::LabelHistogram;

/// Share of predictions that differ from the true labels.
pub fn error_rate<P: AsRef<str>, T: AsRef<str>>(predicted: &[P], actual: &[T]) -> Result<f64, TreeError> {
    if predicted.len() != actual.len() {
        return Err(TreeError::LengthMismatch(predicted.len(), actual.len()));
    }
    if actual.is_empty() {
        return Err(TreeError::EmptyInput("an error rate".to_string()));
    }
    let errors = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| AsRef::<str>::as_ref(*p) != AsRef::<str>::as_ref(*a))
        .count();
    Ok(errors as f64 / actual.len() as f64)
}

/// Label entropy and the error of always predicting the majority label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelSummary {
    pub entropy: f64,
    pub error: f64,
}

impl LabelSummary {
    pub fn from_labels<T: AsRef<str>>(labels: &[T]) -> Result<Self, TreeError> {
        if labels.is_empty() {
            return Err(TreeError::EmptyInput("label statistics".to_string()));
        }
        let histogram = LabelHistogram::from_labels(labels.iter().map(|l| AsRef::<str>::as_ref(l)));
        Ok(LabelSummary {
            entropy: histogram.entropy(),
            error: histogram.majority_error(),
        })
    }

    /// Two lines, `entropy: <float>` and `error: <float>`.
    pub fn report(&self) -> String {
        format!("entropy: {:?}\nerror: {:?}\n", self.entropy, self.error)
    }
}
