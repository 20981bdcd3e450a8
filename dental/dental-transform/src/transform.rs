//! Rigid transform between scanner space and a tooth's design space.

use nalgebra::{Matrix3, Matrix4, Point3, RowVector4, UnitQuaternion, Vector3};

use crate::error::{TransformError, TransformResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Determinant magnitude below which a matrix is treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// A 4x4 homogeneous transform stored in row-vector convention.
///
/// Points are row vectors multiplied on the left of the matrix:
/// `[x', y', z', w'] = [x, y, z, 1] · M`. The translation therefore lives in
/// the bottom row and the last column is `(0, 0, 0, 1)` for a well-formed
/// rigid transform.
///
/// The stored matrix maps **scanner space to design space**. Its inverse
/// maps a design-space point (a margin point, a margin centroid) back onto
/// the scan. [`to_design`](Self::to_design) and
/// [`to_scanner`](Self::to_scanner) name the two directions so that callers
/// never have to remember which one is the "forward" matrix.
///
/// # Example
///
/// ```
/// use dental_transform::DesignTransform;
/// use nalgebra::{Point3, Vector3};
///
/// // Scanner origin sits at x = 10 in the tooth's design frame.
/// let transform = DesignTransform::from_translation(Vector3::new(10.0, 0.0, 0.0));
///
/// let design = transform.to_design(&[Point3::origin()]);
/// assert!((design[0].x - 10.0).abs() < 1e-12);
///
/// let scanner = transform.to_scanner(&[Point3::new(12.0, 0.0, 0.0)]).unwrap();
/// assert!((scanner[0].x - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignTransform {
    matrix: Matrix4<f64>,
}

impl Default for DesignTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl DesignTransform {
    /// The identity transform. Used whenever a record carries no matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Wraps a matrix that is already in row-vector layout.
    #[must_use]
    pub const fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Builds a transform from row-major coefficients, `rows[r][c]`.
    ///
    /// ```
    /// use dental_transform::DesignTransform;
    ///
    /// let t = DesignTransform::from_rows([
    ///     [1.0, 0.0, 0.0, 0.0],
    ///     [0.0, 1.0, 0.0, 0.0],
    ///     [0.0, 0.0, 1.0, 0.0],
    ///     [5.0, 6.0, 7.0, 1.0],
    /// ]);
    /// assert_eq!(t.translation().x, 5.0);
    /// ```
    #[must_use]
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self {
            matrix: Matrix4::from_fn(|r, c| rows[r][c]),
        }
    }

    /// Builds a transform from sparse `(row, col, value)` cells.
    ///
    /// Cells that are not provided keep their identity value (1 on the
    /// diagonal, 0 elsewhere). This matches case files that only list the
    /// coefficients differing from identity.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::CellOutOfRange`] if a row or column index is
    /// greater than 3.
    ///
    /// # Example
    ///
    /// ```
    /// use dental_transform::DesignTransform;
    ///
    /// let t = DesignTransform::from_cells([(3, 0, 10.0), (3, 2, -1.5)]).unwrap();
    /// assert_eq!(t.translation().x, 10.0);
    /// assert_eq!(t.translation().z, -1.5);
    /// assert_eq!(t.matrix()[(1, 1)], 1.0);
    /// ```
    pub fn from_cells(
        cells: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> TransformResult<Self> {
        let mut matrix = Matrix4::identity();
        for (row, col, value) in cells {
            if row > 3 || col > 3 {
                return Err(TransformError::cell_out_of_range(row, col));
            }
            matrix[(row, col)] = value;
        }
        Ok(Self { matrix })
    }

    /// A pure translation: `p_design = p_scanner + translation`.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        let mut matrix = Matrix4::identity();
        matrix[(3, 0)] = translation.x;
        matrix[(3, 1)] = translation.y;
        matrix[(3, 2)] = translation.z;
        Self { matrix }
    }

    /// Rotation followed by translation: `p_design = R · p_scanner + t`.
    ///
    /// The rotation block is stored transposed because points multiply the
    /// matrix from the left.
    #[must_use]
    pub fn from_rotation_translation(
        rotation: UnitQuaternion<f64>,
        translation: Vector3<f64>,
    ) -> Self {
        let r = rotation.to_rotation_matrix();
        let mut matrix = Matrix4::identity();
        for i in 0..3 {
            for j in 0..3 {
                matrix[(i, j)] = r[(j, i)];
            }
        }
        matrix[(3, 0)] = translation.x;
        matrix[(3, 1)] = translation.y;
        matrix[(3, 2)] = translation.z;
        Self { matrix }
    }

    /// The raw row-vector matrix.
    #[inline]
    #[must_use]
    pub const fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Upper-left 3x3 block, in row-vector layout.
    #[must_use]
    pub fn linear_block(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Translation component (bottom row).
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(
            self.matrix[(3, 0)],
            self.matrix[(3, 1)],
            self.matrix[(3, 2)],
        )
    }

    /// Returns true if every coefficient is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }

    /// Returns true if every coefficient is within `epsilon` of identity.
    #[must_use]
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.matrix - Matrix4::identity()).amax() < epsilon
    }

    /// Maps one point through the matrix (row vector on the left).
    ///
    /// The homogeneous coordinate is dropped, not divided through: rigid
    /// transforms keep `w = 1`.
    #[inline]
    #[must_use]
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let row = RowVector4::new(point.x, point.y, point.z, 1.0) * self.matrix;
        Point3::new(row[0], row[1], row[2])
    }

    /// Maps scanner-space points into this tooth's design space.
    #[must_use]
    pub fn to_design(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        apply(self, points)
    }

    /// Maps design-space points back into scanner space.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform cannot be inverted.
    pub fn to_scanner(&self, points: &[Point3<f64>]) -> TransformResult<Vec<Point3<f64>>> {
        let inverse = self.inverse()?;
        Ok(apply(&inverse, points))
    }

    /// Exact matrix inverse.
    ///
    /// # Errors
    ///
    /// - [`TransformError::NonFinite`] if any coefficient is NaN or infinite
    /// - [`TransformError::Singular`] if the determinant is (numerically) zero
    pub fn inverse(&self) -> TransformResult<Self> {
        if !self.is_finite() {
            return Err(TransformError::NonFinite);
        }
        let determinant = self.matrix.determinant();
        if determinant.abs() < SINGULAR_EPSILON {
            return Err(TransformError::singular(determinant));
        }
        self.matrix
            .try_inverse()
            .map(|matrix| Self { matrix })
            .ok_or_else(|| TransformError::singular(determinant))
    }

    /// Composes two transforms: the result applies `self` first, then `then`.
    #[must_use]
    pub fn then(&self, then: &Self) -> Self {
        Self {
            matrix: self.matrix * then.matrix,
        }
    }
}

/// Applies `transform` to every point, preserving order.
///
/// An empty slice yields an empty vector.
#[must_use]
pub fn apply(transform: &DesignTransform, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    points.iter().map(|p| transform.apply_point(p)).collect()
}

/// Inverts `transform`.
///
/// # Errors
///
/// See [`DesignTransform::inverse`].
pub fn invert(transform: &DesignTransform) -> TransformResult<DesignTransform> {
    transform.inverse()
}
