//! Spatial queries over dental scan meshes.
//!
//! - [`SpatialQuery`] - nearest-surface trait, one distance per query point
//! - [`BruteForceQuery`] - exact linear scan, the reference implementation
//! - [`BvhQuery`] - bounding volume hierarchy with branch-and-bound descent
//! - [`PointGrid`] - uniform hash grid for radius and nearest-point lookups
//!
//! Meshes with vertices but no faces are treated as point clouds: the
//! "surface" is the vertex set. Empty meshes report infinite distance.
//!
//! # Example
//!
//! ```
//! use dental_spatial::{BruteForceQuery, BvhQuery, QueryParams, SpatialQuery};
//! use dental_types::{Point3, ScanMesh};
//!
//! let mesh = ScanMesh::point_cloud(vec![Point3::origin(), Point3::new(10.0, 0.0, 0.0)]);
//! let bvh = BvhQuery::build(&mesh, QueryParams::default());
//! let brute = BruteForceQuery::new(&mesh);
//!
//! let probes = [Point3::new(9.0, 0.0, 0.0)];
//! assert_eq!(bvh.nearest_surface(&probes), brute.nearest_surface(&probes));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bvh;
mod error;
mod grid;
mod params;
mod query;

pub use bvh::BvhQuery;
pub use error::{SpatialError, SpatialResult};
pub use grid::PointGrid;
pub use params::QueryParams;
pub use query::{BruteForceQuery, SpatialQuery, SurfaceHit};
