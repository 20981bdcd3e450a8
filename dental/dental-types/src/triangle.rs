//! Triangle type and closest-point computation.

use nalgebra::{Point3, Vector3};

/// A triangle with concrete vertex positions.
///
/// # Example
///
/// ```
/// use dental_types::{Point3, Triangle};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
/// let p = tri.closest_point(&Point3::new(0.25, 0.25, 2.0));
/// assert!((p - Point3::new(0.25, 0.25, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unnormalized normal; its length is twice the area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Triangle area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Centroid of the three vertices.
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Closest point on the triangle (interior, edges or vertices) to `p`.
    ///
    /// Voronoi-region walk over barycentric coordinates. Zero-area triangles
    /// (repeated or collinear vertices) fall back to the closest point on
    /// their three edges, so the result is finite for any finite input.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn closest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;
        if self.is_degenerate() {
            return self.closest_point_on_edges(p);
        }
        let ap = p - a;

        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1.mul_add(d4, -(d3 * d2));
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = edge_ratio(d1, d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5.mul_add(d2, -(d1 * d6));
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = edge_ratio(d2, d2 - d6);
            return a + ac * w;
        }

        let va = d3.mul_add(d6, -(d5 * d4));
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = edge_ratio(d4 - d3, (d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let sum = va + vb + vc;
        if sum.abs() <= f64::EPSILON {
            return self.closest_point_on_edges(p);
        }
        let v = vb / sum;
        let w = vc / sum;
        a + ab * v + ac * w
    }

    /// True if the triangle has (numerically) zero area.
    ///
    /// Covers faces with a repeated vertex as well as collinear ones.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let ab = self.v1 - self.v0;
        let ac = self.v2 - self.v0;
        ab.cross(&ac).norm_squared() <= f64::EPSILON * ab.norm_squared() * ac.norm_squared()
    }

    /// Distance from `p` to the triangle.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, p: &Point3<f64>) -> f64 {
        (self.closest_point(p) - p).norm()
    }

    fn closest_point_on_edges(&self, p: &Point3<f64>) -> Point3<f64> {
        [
            closest_point_on_segment(p, &self.v0, &self.v1),
            closest_point_on_segment(p, &self.v1, &self.v2),
            closest_point_on_segment(p, &self.v2, &self.v0),
        ]
        .into_iter()
        .min_by(|x, y| (x - p).norm_squared().total_cmp(&(y - p).norm_squared()))
        .unwrap_or(self.v0)
    }
}

/// `num / den` clamped to `[0, 1]`, or 0 when the denominator vanishes.
fn edge_ratio(num: f64, den: f64) -> f64 {
    if den.abs() <= f64::MIN_POSITIVE {
        return 0.0;
    }
    (num / den).clamp(0.0, 1.0)
}

fn closest_point_on_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::EPSILON {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
