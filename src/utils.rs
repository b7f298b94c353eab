use crate::errors::TreeError;

/// Format a sequence of labels as a single line list, `['a', 'b']`.
pub fn fmt_vec_output<T: AsRef<str>>(v: &[T]) -> String {
    let mut res = String::from("[");
    if let Some(last) = v.len().checked_sub(1) {
        for n in &v[..last] {
            res.push_str(format!("'{}'", AsRef::<str>::as_ref(n)).as_str());
            res.push_str(", ");
        }
        res.push_str(format!("'{}'", AsRef::<str>::as_ref(&v[last])).as_str());
    }
    res.push(']');
    res
}

// Validation
pub fn validate_usize_parameter(value: usize, min: usize, max: usize, parameter: &str) -> Result<(), TreeError> {
    if value < min || max < value {
        let ex_msg = format!("integer value within range {} and {}", min, max);
        Err(TreeError::Config(parameter.to_string(), ex_msg, value.to_string()))
    } else {
        Ok(())
    }
}

/// Parse a depth given on the command line. Negative values are rejected
/// as a configuration error rather than a parse error.
pub fn parse_max_depth(raw: &str) -> Result<usize, TreeError> {
    let invalid = || {
        TreeError::Config(
            "max_depth".to_string(),
            "a non-negative integer".to_string(),
            raw.to_string(),
        )
    };
    let depth = raw.trim().parse::<i64>().map_err(|_| invalid())?;
    usize::try_from(depth).map_err(|_| invalid())
}
