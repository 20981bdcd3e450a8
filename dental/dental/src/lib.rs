//! Dental margin alignment verification and vertex classification.
//!
//! This umbrella crate re-exports the dental-* crates and adds case-level
//! processing on top of them.
//!
//! A case is one jaw scan (scanner space) plus per-tooth design records: a
//! closed margin curve in the tooth's design space and a rigid transform from
//! scanner space into design space. From those the toolkit
//!
//! - checks that each transform puts its margin onto the scanned surface, and
//! - labels every scan vertex as tooth, gum or unlabeled.
//!
//! # Quick Start
//!
//! ```
//! use dental::prelude::*;
//!
//! let margin: Vec<Point3<f64>> = (0..16)
//!     .map(|k| {
//!         let t = std::f64::consts::TAU * f64::from(k) / 16.0;
//!         Point3::new(4.0 * t.cos(), 4.0 * t.sin(), 0.0)
//!     })
//!     .collect();
//!
//! let mut cloud = margin.clone();
//! cloud.push(Point3::new(0.0, 0.0, 2.0));
//!
//! let case = Case::new("case-001", Jaw::Upper, ScanMesh::point_cloud(cloud))
//!     .with_tooth(Tooth::new(11).unwrap().with_margin(margin));
//!
//! let report = process_case(&case, &PipelineParams::default()).unwrap();
//! assert!(report.is_acceptable());
//! assert_eq!(
//!     report.classification.as_ref().unwrap().labels[16],
//!     VertexLabel::Tooth
//! );
//! println!("{}", report.to_markdown(ReportOptions::default()));
//! ```
//!
//! # Module Organization
//!
//! - [`transform`] - rigid row-vector transforms, inversion, layout checks
//! - [`types`] - tooth records, scan meshes, margins, labels, cases
//! - [`spatial`] - nearest-surface queries (brute force, BVH) and a point grid
//! - [`align`] - per-tooth distance reports and grades
//! - [`classify`] - tooth/gum vertex labels
//! - [`report`] - text and Markdown rendering
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` on records and results

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Rigid design transforms.
pub use dental_transform as transform;

/// Case records: teeth, meshes, margins, labels.
pub use dental_types as types;

/// Spatial queries over scan meshes.
pub use dental_spatial as spatial;

/// Alignment verification.
pub use dental_align as align;

/// Vertex classification.
pub use dental_classify as classify;

/// Report rendering.
pub use dental_report as report;

// =============================================================================
// Pipeline
// =============================================================================

mod error;
mod params;
mod pipeline;

pub use error::{PipelineError, PipelineResult};
pub use params::PipelineParams;
pub use pipeline::{BatchReport, CaseReport, process_case, process_cases};

// =============================================================================
// Prelude
// =============================================================================

/// Commonly used types and functions.
///
/// # Usage
///
/// ```
/// use dental::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use dental_types::{
        Case, Jaw, Margin, Point3, ScanMesh, Tooth, ToothNumber, Vector3, VertexLabel,
    };

    // Transform
    pub use dental_transform::DesignTransform;

    // Verification and classification
    pub use dental_align::{AlignParams, Grade, verify_alignment, verify_case};
    pub use dental_classify::{ClassifyParams, classify_case, classify_vertices};

    // Reporting
    pub use dental_report::{MarkdownReport, ReportOptions};

    // Pipeline
    pub use crate::{PipelineParams, process_case, process_cases};
}

// =============================================================================
// Tests
// =============================================================================
