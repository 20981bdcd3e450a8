//! Data-validation checks for design transforms.
//!
//! Case files are not always consistent about matrix layout. A matrix whose
//! translation sits in the last column instead of the bottom row was most
//! likely written for column vectors. These checks report such findings as
//! warnings; they never rewrite the matrix.

use std::fmt;

use nalgebra::{Matrix3, Vector3};

use crate::transform::DesignTransform;

/// Default absolute tolerance for [`DesignTransform::validate`].
pub const DEFAULT_VALIDATION_TOLERANCE: f64 = 1e-6;

/// A suspicious property of a transform matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformWarning {
    /// At least one coefficient is NaN or infinite.
    NonFinite,

    /// The last column carries a translation-like vector. The matrix was
    /// probably stored for column vectors (transposed).
    TranslationInLastColumn {
        /// The first three entries of the last column.
        column: Vector3<f64>,
    },

    /// The bottom-right coefficient is not 1.
    NonUnitHomogeneous {
        /// The observed coefficient.
        value: f64,
    },

    /// The 3x3 block is not orthonormal (scale or shear present).
    NonOrthonormal {
        /// Largest absolute entry of `A · Aᵀ - I`.
        deviation: f64,
    },

    /// The 3x3 block is orthonormal but mirrors space.
    Reflection,
}

impl fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "matrix contains non-finite coefficients"),
            Self::TranslationInLastColumn { column } => write!(
                f,
                "translation found in last column ({:.4}, {:.4}, {:.4}); matrix may be transposed",
                column.x, column.y, column.z
            ),
            Self::NonUnitHomogeneous { value } => {
                write!(f, "bottom-right coefficient is {value}, expected 1")
            }
            Self::NonOrthonormal { deviation } => {
                write!(f, "rotation block is not orthonormal (deviation {deviation:.3e})")
            }
            Self::Reflection => write!(f, "rotation block has negative determinant"),
        }
    }
}

impl DesignTransform {
    /// Checks the matrix against the row-vector rigid layout.
    ///
    /// Returns an empty vector for a well-formed transform.
    ///
    /// # Example
    ///
    /// ```
    /// use dental_transform::{DesignTransform, TransformWarning, DEFAULT_VALIDATION_TOLERANCE};
    ///
    /// // Translation written into the last column: column-vector layout.
    /// let t = DesignTransform::from_cells([(0, 3, 10.0)]).unwrap();
    /// let warnings = t.validate(DEFAULT_VALIDATION_TOLERANCE);
    /// assert!(matches!(warnings[0], TransformWarning::TranslationInLastColumn { .. }));
    /// ```
    #[must_use]
    pub fn validate(&self, tolerance: f64) -> Vec<TransformWarning> {
        if !self.is_finite() {
            return vec![TransformWarning::NonFinite];
        }

        let mut warnings = Vec::new();
        let m = self.matrix();

        let column = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        if column.amax() > tolerance {
            warnings.push(TransformWarning::TranslationInLastColumn { column });
        }

        if (m[(3, 3)] - 1.0).abs() > tolerance {
            warnings.push(TransformWarning::NonUnitHomogeneous { value: m[(3, 3)] });
        }

        let block = self.linear_block();
        let deviation = (block * block.transpose() - Matrix3::identity()).amax();
        if deviation > tolerance {
            warnings.push(TransformWarning::NonOrthonormal { deviation });
        } else if block.determinant() < 0.0 {
            warnings.push(TransformWarning::Reflection);
        }

        warnings
    }

    /// Returns true if [`validate`](Self::validate) finds nothing.
    #[must_use]
    pub fn is_rigid(&self, tolerance: f64) -> bool {
        self.validate(tolerance).is_empty()
    }
}
