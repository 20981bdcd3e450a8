//! Error types for spatial index construction.

use thiserror::Error;

/// Errors raised when building a spatial index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    /// Grid cell size must be finite and positive.
    #[error("invalid cell size {size}: must be finite and > 0")]
    InvalidCellSize {
        /// The rejected size.
        size: f64,
    },
}

/// Result type for spatial operations.
pub type SpatialResult<T> = Result<T, SpatialError>;
