//! Alignment verification for dental design transforms.
//!
//! Each tooth record carries a design-space margin curve and a rigid
//! transform from scanner space into design space. If the transform is right,
//! the margin mapped back into scanner space lies on the scanned surface.
//! This crate measures how far off it is.
//!
//! - [`verify_alignment`] - one tooth against one mesh, as a [`DistanceReport`]
//! - [`verify_teeth`] / [`verify_case`] - every tooth of a case, failures collected
//! - [`vertex_margin_distances`] - per-vertex distance to the nearest margin
//!
//! # Grades
//!
//! The mean distance is graded against [`AlignParams`] thresholds:
//! `Excellent` below 0.01, `Pass` below 0.05, `Fail` otherwise.
//!
//! # Logging
//!
//! Transform layout problems found by
//! [`DesignTransform::validate`](dental_transform::DesignTransform::validate)
//! are logged at `warn` level and never corrected.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod params;
mod report;
mod verify;

pub use error::{AlignError, AlignResult};
pub use params::AlignParams;
pub use report::{
    CaseVerification, Correspondence, DistanceReport, Grade, MarginProximity,
    NotVerifiableReason, Verification,
};
pub use verify::{
    vertex_margin_distances, verify_alignment, verify_alignment_with, verify_case, verify_teeth,
};
