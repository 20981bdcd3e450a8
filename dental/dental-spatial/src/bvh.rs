//! Bounding volume hierarchy for nearest-surface queries.
//!
//! Median split along the longest axis, small inline leaf lists, and a
//! branch-and-bound descent that visits the nearer child first and skips any
//! node whose box is farther than the best hit so far.

use dental_types::{Aabb, Point3, ScanMesh};
use rayon::prelude::*;
use smallvec::SmallVec;
use tracing::debug;

use crate::params::QueryParams;
use crate::query::{SpatialQuery, SurfaceHit};

/// BVH node holding either primitive indices or two children.
#[derive(Debug)]
enum BvhNode {
    Leaf {
        bbox: Aabb,
        primitives: SmallVec<[u32; 8]>,
    },
    Internal {
        bbox: Aabb,
        left: Box<Self>,
        right: Box<Self>,
    },
}

impl BvhNode {
    const fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }
}

/// Accelerated [`SpatialQuery`] over a borrowed mesh.
///
/// Primitives are the mesh faces, or the vertices when the mesh has none.
///
/// # Example
///
/// ```
/// use dental_spatial::{BvhQuery, QueryParams, SpatialQuery};
/// use dental_types::{Point3, ScanMesh};
///
/// let mesh = ScanMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// )
/// .unwrap();
///
/// let bvh = BvhQuery::build(&mesh, QueryParams::default());
/// let d = bvh.nearest_surface(&[Point3::new(0.1, 0.1, 0.5)]);
/// assert!((d[0] - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct BvhQuery<'a> {
    mesh: &'a ScanMesh,
    root: Option<BvhNode>,
    params: QueryParams,
}

impl<'a> BvhQuery<'a> {
    /// Build the hierarchy for `mesh`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // face and vertex counts fit u32 by mesh construction
    pub fn build(mesh: &'a ScanMesh, params: QueryParams) -> Self {
        let boxes: Vec<(u32, Aabb)> = if mesh.is_point_cloud() {
            mesh.vertices()
                .iter()
                .enumerate()
                .map(|(i, v)| (i as u32, Aabb::new(*v, *v)))
                .collect()
        } else {
            mesh.triangles()
                .enumerate()
                .map(|(i, t)| (i as u32, Aabb::from_points([t.v0, t.v1, t.v2].iter())))
                .collect()
        };

        let root = if boxes.is_empty() {
            None
        } else {
            let indices: Vec<usize> = (0..boxes.len()).collect();
            Some(build_recursive(&boxes, indices, params.max_leaf_size.max(1)))
        };

        debug!(
            primitives = boxes.len(),
            point_cloud = mesh.is_point_cloud(),
            "built nearest-surface BVH"
        );

        Self { mesh, root, params }
    }

    /// The indexed mesh.
    #[must_use]
    pub const fn mesh(&self) -> &'a ScanMesh {
        self.mesh
    }

    /// True if there is nothing to query against.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn primitive_closest(&self, primitive: u32, point: &Point3<f64>) -> Point3<f64> {
        if self.mesh.is_point_cloud() {
            self.mesh.vertices()[primitive as usize]
        } else {
            self.mesh
                .triangle(primitive as usize)
                .map_or(*point, |t| t.closest_point(point))
        }
    }

    fn search(&self, node: &BvhNode, point: &Point3<f64>, best: &mut Option<SurfaceHit>) {
        let bound = best.map_or(f64::INFINITY, |b| b.distance * b.distance);
        if node.bbox().distance_squared_to(point) > bound {
            return;
        }

        match node {
            BvhNode::Leaf { primitives, .. } => {
                for &primitive in primitives {
                    let candidate = self.primitive_closest(primitive, point);
                    let distance = (candidate - point).norm();
                    // Lowest primitive index wins ties, matching the linear scan.
                    let better = best.is_none_or(|b| {
                        distance < b.distance || (distance == b.distance && primitive < b.primitive)
                    });
                    if better {
                        *best = Some(SurfaceHit {
                            point: candidate,
                            distance,
                            primitive,
                        });
                    }
                }
            }
            BvhNode::Internal { left, right, .. } => {
                let dl = left.bbox().distance_squared_to(point);
                let dr = right.bbox().distance_squared_to(point);
                let (near, far) = if dl <= dr { (left, right) } else { (right, left) };
                self.search(near, point, best);
                self.search(far, point, best);
            }
        }
    }
}

impl SpatialQuery for BvhQuery<'_> {
    fn closest_point(&self, point: &Point3<f64>) -> Option<SurfaceHit> {
        let root = self.root.as_ref()?;
        let mut best = None;
        self.search(root, point, &mut best);
        best
    }

    fn closest_points(&self, points: &[Point3<f64>]) -> Vec<Option<SurfaceHit>> {
        if self.params.use_parallel(points.len()) {
            points.par_iter().map(|p| self.closest_point(p)).collect()
        } else {
            points.iter().map(|p| self.closest_point(p)).collect()
        }
    }
}

fn build_recursive(boxes: &[(u32, Aabb)], indices: Vec<usize>, max_leaf_size: usize) -> BvhNode {
    let bbox = indices
        .iter()
        .fold(Aabb::empty(), |acc, &i| acc.union(&boxes[i].1));

    if indices.len() <= max_leaf_size {
        return BvhNode::Leaf {
            bbox,
            primitives: indices.iter().map(|&i| boxes[i].0).collect(),
        };
    }

    let axis = bbox.longest_axis();
    let mut sorted = indices;
    sorted.sort_by(|&a, &b| {
        let ca = boxes[a].1.center()[axis];
        let cb = boxes[b].1.center()[axis];
        ca.total_cmp(&cb)
    });

    let right_indices = sorted.split_off(sorted.len() / 2);
    let left = build_recursive(boxes, sorted, max_leaf_size);
    let right = build_recursive(boxes, right_indices, max_leaf_size);

    BvhNode::Internal {
        bbox,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::BruteForceQuery;
    use approx::assert_relative_eq;

    /// A wavy height-field grid of `n x n` quads.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn height_field(n: usize) -> ScanMesh {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let (x, y) = (i as f64, j as f64);
                vertices.push(Point3::new(x, y, (x * 0.7).sin() + (y * 0.3).cos()));
            }
        }
        let stride = (n + 1) as u32;
        let mut faces = Vec::new();
        for j in 0..n as u32 {
            for i in 0..n as u32 {
                let a = j * stride + i;
                faces.push([a, a + 1, a + stride + 1]);
                faces.push([a, a + stride + 1, a + stride]);
            }
        }
        ScanMesh::from_parts(vertices, faces).unwrap()
    }

    #[test]
    fn test_matches_brute_force() {
        let mesh = height_field(12);
        let bvh = BvhQuery::build(&mesh, QueryParams::default().with_max_leaf_size(3));
        let brute = BruteForceQuery::new(&mesh);

        let probes: Vec<Point3<f64>> = (0..50)
            .map(|k| {
                let t = f64::from(k);
                Point3::new((t * 1.37) % 14.0 - 1.0, (t * 2.11) % 14.0 - 1.0, (t * 0.53) % 6.0 - 3.0)
            })
            .collect();

        let a = bvh.nearest_surface(&probes);
        let b = brute.nearest_surface(&probes);
        for (x, y) in a.iter().zip(&b) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_repeated_index_faces() {
        let base = height_field(4);
        let mut faces = base.faces().to_vec();
        faces.extend([[0, 0, 1], [6, 7, 6], [8, 12, 12], [3, 3, 3]]);
        let mesh = ScanMesh::from_parts(base.vertices().to_vec(), faces).unwrap();

        let probes: Vec<Point3<f64>> = (0..40)
            .map(|k| {
                let t = f64::from(k);
                Point3::new((t * 0.91) % 6.0 - 1.0, (t * 1.53) % 6.0 - 1.0, (t * 0.37) % 5.0 - 2.5)
            })
            .collect();

        let brute = BruteForceQuery::new(&mesh);
        let expected = brute.nearest_surface(&probes);
        for leaf in [1, 2, 4, 8] {
            let bvh = BvhQuery::build(&mesh, QueryParams::default().with_max_leaf_size(leaf));
            let found = bvh.nearest_surface(&probes);
            for (x, y) in found.iter().zip(&expected) {
                assert!(x.is_finite() && *x >= 0.0, "leaf {leaf}: {x}");
                assert_relative_eq!(*x, *y, epsilon = 1e-12);
            }
        }

        // A mesh made only of a collapsed face still answers with its edge.
        let sliver = ScanMesh::from_parts(
            vec![Point3::origin(), Point3::new(2.0, 0.0, 0.0)],
            vec![[0, 0, 1]],
        )
        .unwrap();
        let hit = BvhQuery::build(&sliver, QueryParams::default())
            .closest_point(&Point3::new(1.0, 3.0, 0.0))
            .unwrap();
        assert_eq!(hit.primitive, 0);
        assert_relative_eq!(hit.distance, 3.0);
    }

    #[test]
    fn test_empty_and_point_cloud() {
        let empty = ScanMesh::new();
        let bvh = BvhQuery::build(&empty, QueryParams::default());
        assert!(bvh.is_empty());
        assert!(bvh.closest_point(&Point3::origin()).is_none());
        assert_eq!(bvh.nearest_surface(&[Point3::origin()]), vec![f64::INFINITY]);

        let cloud = ScanMesh::point_cloud(vec![Point3::origin(), Point3::new(100.0, 0.0, 0.0)]);
        let bvh = BvhQuery::build(&cloud, QueryParams::default().with_max_leaf_size(1));
        let hit = bvh.closest_point(&Point3::new(100.0, 0.0, 0.0)).unwrap();
        assert_eq!(hit.primitive, 1);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let mesh = height_field(6);
        let probes: Vec<Point3<f64>> = (0..20)
            .map(|k| Point3::new(f64::from(k) * 0.3, 2.0, 1.5))
            .collect();
        let seq = BvhQuery::build(&mesh, QueryParams::default().with_parallel(false));
        let par = BvhQuery::build(&mesh, QueryParams::default().with_parallel_threshold(1));
        assert_eq!(seq.closest_points(&probes), par.closest_points(&probes));
    }
}
