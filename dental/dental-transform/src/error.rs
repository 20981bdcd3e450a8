//! Error types for transform operations.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors raised when a design transform cannot be built or inverted.
///
/// Any of these marks the owning tooth's transform as invalid. Callers
/// processing several teeth treat it as fatal for that tooth only.
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransformError {
    /// The matrix has no inverse.
    #[error("transform matrix is singular (determinant {determinant:e})")]
    Singular {
        /// Determinant of the offending matrix.
        determinant: f64,
    },

    /// The matrix contains NaN or infinite coefficients.
    #[error("transform matrix contains non-finite coefficients")]
    NonFinite,

    /// A coefficient was addressed outside the 4x4 grid.
    #[error("matrix cell ({row}, {col}) is outside the 4x4 range")]
    CellOutOfRange {
        /// Row index of the cell.
        row: usize,
        /// Column index of the cell.
        col: usize,
    },
}

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

impl TransformError {
    /// Create a singular-matrix error.
    #[must_use]
    pub const fn singular(determinant: f64) -> Self {
        Self::Singular { determinant }
    }

    /// Create an out-of-range cell error.
    #[must_use]
    pub const fn cell_out_of_range(row: usize, col: usize) -> Self {
        Self::CellOutOfRange { row, col }
    }
}
