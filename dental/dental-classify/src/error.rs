//! Error types for vertex classification.

use thiserror::Error;

/// Result type for classification.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Errors that stop a classification run.
///
/// Per-tooth problems (short margins, singular transforms) are not errors;
/// they are reported in [`ToothOutcome`](crate::ToothOutcome).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// A parameter is out of range.
    #[error("invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

impl ClassifyError {
    /// Create an invalid parameter error.
    #[must_use]
    pub const fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClassifyError::invalid_parameter("prune_radius", -1.0);
        assert_eq!(err.to_string(), "invalid parameter prune_radius = -1");
    }
}
