//! Rigid design-space transforms for dental margin data.
//!
//! A restoration case stores, for every tooth, a 4x4 matrix `M` that maps
//! intraoral-scanner coordinates into the tooth's local design space. This
//! crate wraps that matrix in [`DesignTransform`] and provides the two
//! directions used downstream:
//!
//! - scanner to design: [`DesignTransform::to_design`] (or [`apply`])
//! - design to scanner: [`DesignTransform::to_scanner`] (or [`invert`] then [`apply`])
//!
//! # Convention
//!
//! Points are **row vectors**: `[x y z 1] · M`. The translation therefore
//! lives in the bottom row (`M[3][0..3]`), and the upper-left 3x3 block is the
//! transpose of the familiar column-vector rotation.
//!
//! Matrices read from case files are used as-is. [`DesignTransform::validate`]
//! reports layout problems (translation in the last column, scale, reflection)
//! without correcting them.
//!
//! # Example
//!
//! ```
//! use dental_transform::{DesignTransform, Point3, Vector3};
//!
//! let m = DesignTransform::from_translation(Vector3::new(0.0, 0.0, 2.0));
//! let design = m.to_design(&[Point3::new(1.0, 1.0, 1.0)]);
//! assert_eq!(design[0], Point3::new(1.0, 1.0, 3.0));
//!
//! let back = m.to_scanner(&design).unwrap();
//! assert!((back[0] - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod transform;
mod validate;

pub use error::{TransformError, TransformResult};
pub use transform::{DesignTransform, SINGULAR_EPSILON, apply, invert};
pub use validate::{DEFAULT_VALIDATION_TOLERANCE, TransformWarning};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
