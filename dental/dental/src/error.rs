//! Error types for case processing.

use dental_align::AlignError;
use dental_classify::ClassifyError;
use thiserror::Error;

/// Errors that stop processing of a case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Alignment parameters are invalid.
    #[error(transparent)]
    Align(#[from] AlignError),

    /// Classification parameters are invalid.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Strict mode: at least one tooth transform could not be used.
    #[error("{count} tooth transform(s) failed, first: {first}")]
    ToothFailures {
        /// Number of failed teeth.
        count: usize,
        /// The first failure.
        first: AlignError,
    },

    /// Error raised while processing a specific case.
    #[error("case {id}: {source}")]
    Case {
        /// Case identifier.
        id: String,
        /// The underlying error.
        #[source]
        source: Box<PipelineError>,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Attach a case identifier.
    #[must_use]
    pub fn in_case(self, id: impl Into<String>) -> Self {
        Self::Case {
            id: id.into(),
            source: Box::new(self),
        }
    }

    /// The case identifier, if attached.
    #[must_use]
    pub fn case_id(&self) -> Option<&str> {
        match self {
            Self::Case { id, .. } => Some(id),
            _ => None,
        }
    }
}
