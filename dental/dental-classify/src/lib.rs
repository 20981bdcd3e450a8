//! Tooth/gum vertex classification from margin curves.
//!
//! A margin curve marks where a restoration meets the prepared tooth. Scan
//! vertices inside the margin's footprint that sit above the curve belong to
//! the tooth; those at or below it belong to the gum. Everything else stays
//! unlabeled.
//!
//! Teeth are processed independently and their claims merged with a fixed
//! priority (`Tooth` over `Gum` over `Unlabeled`), so the result is the same
//! for any tooth order and for parallel and sequential runs.
//!
//! # Example
//!
//! ```
//! use dental_classify::{classify_vertices, ClassifyParams};
//! use dental_types::ScanMesh;
//!
//! let mesh = ScanMesh::new();
//! let result = classify_vertices(&mesh, &[], &ClassifyParams::default()).unwrap();
//! assert!(result.labels.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod classify;
mod error;
mod params;
mod result;

pub use classify::{classify_case, classify_vertices};
pub use error::{ClassifyError, ClassifyResult};
pub use params::ClassifyParams;
pub use result::{Classification, LabelSummary, ToothOutcome};

pub use dental_types::VertexLabel;
