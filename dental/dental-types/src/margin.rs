//! Margin curves and their geometry metrics.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Aabb;

/// Fewest points a margin needs to describe a footprint.
pub const MIN_MARGIN_POINTS: usize = 3;

/// Largest extent below which a margin is considered implausibly small.
pub const OUTLIER_MIN_EXTENT: f64 = 0.5;

/// Largest extent above which a margin is considered implausibly large.
pub const OUTLIER_MAX_EXTENT: f64 = 100.0;

/// A closed margin polygon in a tooth's design space.
///
/// Points are ordered; the last point connects back to the first without
/// being repeated. Pontics usually have an empty margin.
///
/// # Example
///
/// ```
/// use dental_types::{Margin, Point3};
///
/// let square = Margin::new(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
///
/// assert!(square.has_geometry());
/// assert!((square.arc_length() - 4.0).abs() < 1e-12);
/// assert_eq!(square.centroid(), Some(Point3::new(0.5, 0.5, 0.0)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Margin(Vec<Point3<f64>>);

impl Margin {
    /// Wrap an ordered point list.
    #[must_use]
    pub const fn new(points: Vec<Point3<f64>>) -> Self {
        Self(points)
    }

    /// The margin points.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.0
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no points.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the margin has at least [`MIN_MARGIN_POINTS`] points.
    #[inline]
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.0.len() >= MIN_MARGIN_POINTS
    }

    /// Arithmetic mean of the points.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.0.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.0.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.0.len() as f64))
    }

    /// Perimeter of the closed polygon, including the closing segment.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        if self.0.len() < 2 {
            return 0.0;
        }
        let open: f64 = self.0.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => open + (first - last).norm(),
            _ => open,
        }
    }

    /// Bounding box of the points.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.0.iter())
    }

    /// Bounding box size `(dx, dy, dz)`. Zero when empty.
    #[must_use]
    pub fn extent(&self) -> Vector3<f64> {
        self.bounds().size()
    }

    /// Lowest and highest z coordinate.
    #[must_use]
    pub fn z_range(&self) -> Option<(f64, f64)> {
        let bounds = self.bounds();
        (!bounds.is_empty()).then_some((bounds.min.z, bounds.max.z))
    }

    /// Largest planar (xy) distance of any point from the design origin.
    #[must_use]
    pub fn max_planar_radius(&self) -> f64 {
        self.0
            .iter()
            .map(|p| p.x.hypot(p.y))
            .fold(0.0, f64::max)
    }

    /// Implausible size: largest extent below [`OUTLIER_MIN_EXTENT`] or
    /// above [`OUTLIER_MAX_EXTENT`].
    #[must_use]
    pub fn is_geometric_outlier(&self) -> bool {
        let largest = self.extent().max();
        !(OUTLIER_MIN_EXTENT..=OUTLIER_MAX_EXTENT).contains(&largest)
    }
}

impl From<Vec<Point3<f64>>> for Margin {
    fn from(points: Vec<Point3<f64>>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point3<f64>> for Margin {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
