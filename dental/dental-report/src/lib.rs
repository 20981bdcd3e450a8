//! Human-readable summaries of alignment verification and vertex
//! classification.
//!
//! - [`AlignmentProof`] - plain text for one tooth: statistics, sample
//!   correspondences and grade
//! - [`MarkdownReport`] - one case, alignment and label tables
//! - [`BatchTable`] - one row per case
//!
//! All renderers implement [`Display`](std::fmt::Display); call
//! `to_string()` or write them straight to a file or terminal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod markdown;
mod options;
mod text;

pub use markdown::{BatchRow, BatchTable, MarkdownReport};
pub use options::ReportOptions;
pub use text::AlignmentProof;
