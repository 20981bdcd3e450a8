//! Typed case records for dental margin analysis.
//!
//! - [`ScanMesh`] - scanner-space vertices and validated triangle faces
//! - [`Tooth`] - FDI number, reconstruction type, design-space [`Margin`] and transform
//! - [`Case`] - one mesh with its tooth records
//! - [`VertexLabel`] - per-vertex region label with order-independent merge
//! - [`Triangle`], [`Aabb`] - geometric helpers shared by the spatial queries
//!
//! Records are validated when built: tooth numbers must be FDI permanent
//! teeth and faces must address existing vertices. Loader code gets a
//! [`TypesError`] instead of a record that fails later.
//!
//! # Units
//!
//! Coordinates are `f64` millimetres, as written by the design software.
//!
//! # Example
//!
//! ```
//! use dental_types::{Jaw, Margin, Point3, Tooth};
//!
//! let tooth = Tooth::new(21).unwrap().with_margin(Margin::new(vec![
//!     Point3::new(4.0, 0.0, 0.0),
//!     Point3::new(0.0, 4.0, 0.0),
//!     Point3::new(-4.0, 0.0, 0.0),
//!     Point3::new(0.0, -4.0, 0.0),
//! ]));
//!
//! assert_eq!(tooth.jaw(), Jaw::Upper);
//! assert!(tooth.margin().has_geometry());
//! assert!((tooth.margin().max_planar_radius() - 4.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod case;
mod error;
mod label;
mod margin;
mod mesh;
mod tooth;
mod triangle;

pub use bounds::Aabb;
pub use case::{Case, JawCoverage};
pub use error::{TypesError, TypesResult};
pub use label::VertexLabel;
pub use margin::{MIN_MARGIN_POINTS, Margin, OUTLIER_MAX_EXTENT, OUTLIER_MIN_EXTENT};
pub use mesh::ScanMesh;
pub use tooth::{Jaw, ReconstructionType, TRAINING_SAMPLE_MIN_POINTS, Tooth, ToothNumber};
pub use triangle::Triangle;

pub use dental_transform::DesignTransform;
pub use nalgebra::{Point3, Vector3};
