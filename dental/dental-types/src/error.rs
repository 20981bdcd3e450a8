//! Error types for record construction.

use dental_transform::TransformError;
use thiserror::Error;

/// Errors raised while building case records from loader data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// The tooth number is not a valid FDI permanent-dentition number.
    #[error("invalid FDI tooth number {number} (expected quadrant 1-4, position 1-8)")]
    InvalidToothNumber {
        /// The rejected number.
        number: u8,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfBounds {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The tooth's transform could not be built.
    #[error("invalid transform: {0}")]
    Transform(#[from] TransformError),
}

/// Result type for record construction.
pub type TypesResult<T> = Result<T, TypesError>;

impl TypesError {
    /// Create an invalid tooth number error.
    #[must_use]
    pub const fn invalid_tooth_number(number: u8) -> Self {
        Self::InvalidToothNumber { number }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TypesError::invalid_tooth_number(19);
        assert!(err.to_string().contains("19"));

        let err = TypesError::FaceIndexOutOfBounds {
            face: 2,
            index: 7,
            vertex_count: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("face 2"));
        assert!(msg.contains("vertex 7"));

        let err: TypesError = TransformError::NonFinite.into();
        assert!(err.to_string().contains("non-finite"));
    }
}
