//! Error types for alignment verification.

use dental_transform::TransformError;
use dental_types::ToothNumber;
use thiserror::Error;

/// Errors that stop verification of one tooth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// The tooth's transform cannot be inverted.
    #[error("tooth {tooth}: {source}")]
    Transform {
        /// Affected tooth.
        tooth: ToothNumber,
        /// Underlying transform failure.
        source: TransformError,
    },

    /// Grade thresholds are not finite, positive and ordered.
    #[error("invalid grade thresholds: excellent {excellent}, pass {pass}")]
    InvalidThresholds {
        /// Excellent threshold.
        excellent: f64,
        /// Pass threshold.
        pass: f64,
    },

    /// Proximity grid cell size must be finite and positive.
    #[error("invalid proximity cell size {0}")]
    InvalidCellSize(f64),
}

/// Result type for alignment operations.
pub type AlignResult<T> = Result<T, AlignError>;

impl AlignError {
    /// Wrap a transform failure for `tooth`.
    #[must_use]
    pub const fn transform(tooth: ToothNumber, source: TransformError) -> Self {
        Self::Transform { tooth, source }
    }

    /// The affected tooth, if the error belongs to one.
    #[must_use]
    pub const fn tooth(&self) -> Option<ToothNumber> {
        match self {
            Self::Transform { tooth, .. } => Some(*tooth),
            Self::InvalidThresholds { .. } | Self::InvalidCellSize(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let tooth = ToothNumber::new(14).unwrap();
        let err = AlignError::transform(tooth, TransformError::singular(0.0));
        let msg = err.to_string();
        assert!(msg.contains("tooth 14"));
        assert!(msg.contains("singular"));
        assert_eq!(err.tooth(), Some(tooth));

        let err = AlignError::InvalidThresholds {
            excellent: 0.1,
            pass: 0.05,
        };
        assert!(err.to_string().contains("thresholds"));
        assert_eq!(err.tooth(), None);
    }
}
