//! Nearest-surface query trait and the brute-force reference implementation.

use dental_types::{Point3, ScanMesh};
use rayon::prelude::*;

/// The closest surface point found for a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Closest point on the surface.
    pub point: Point3<f64>,
    /// Euclidean distance from the query point.
    pub distance: f64,
    /// Face containing `point`, or the vertex index for point clouds.
    pub primitive: u32,
}

/// Nearest-point queries against a scanner-space surface.
///
/// Implementations answer [`closest_point`](Self::closest_point); the batch
/// methods have data-parallel defaults. For a mesh with vertices but no
/// faces the surface is the vertex set.
pub trait SpatialQuery: Sync {
    /// Closest surface point to `point`, or `None` if the surface is empty.
    fn closest_point(&self, point: &Point3<f64>) -> Option<SurfaceHit>;

    /// Closest surface point for every query point, in input order.
    fn closest_points(&self, points: &[Point3<f64>]) -> Vec<Option<SurfaceHit>> {
        points.par_iter().map(|p| self.closest_point(p)).collect()
    }

    /// Distance to the surface for every query point, in input order.
    ///
    /// Distances are non-negative; an empty surface yields `f64::INFINITY`.
    fn nearest_surface(&self, points: &[Point3<f64>]) -> Vec<f64> {
        self.closest_points(points)
            .into_iter()
            .map(|hit| hit.map_or(f64::INFINITY, |h| h.distance))
            .collect()
    }
}

/// Linear scan over every face (or vertex, for point clouds).
///
/// Exact and simple; used as the reference the accelerated query is tested
/// against and for very small meshes.
#[derive(Debug, Clone, Copy)]
pub struct BruteForceQuery<'a> {
    mesh: &'a ScanMesh,
}

impl<'a> BruteForceQuery<'a> {
    /// Borrow `mesh` for querying.
    #[must_use]
    pub const fn new(mesh: &'a ScanMesh) -> Self {
        Self { mesh }
    }
}

impl SpatialQuery for BruteForceQuery<'_> {
    #[allow(clippy::cast_possible_truncation)] // face and vertex counts fit u32 by mesh construction
    fn closest_point(&self, point: &Point3<f64>) -> Option<SurfaceHit> {
        let mut best: Option<SurfaceHit> = None;
        let mut consider = |candidate: Point3<f64>, primitive: usize| {
            let distance = (candidate - point).norm();
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(SurfaceHit {
                    point: candidate,
                    distance,
                    primitive: primitive as u32,
                });
            }
        };

        if self.mesh.is_point_cloud() {
            for (i, v) in self.mesh.vertices().iter().enumerate() {
                consider(*v, i);
            }
        } else {
            for (i, tri) in self.mesh.triangles().enumerate() {
                consider(tri.closest_point(point), i);
            }
        }
        best
    }
}
