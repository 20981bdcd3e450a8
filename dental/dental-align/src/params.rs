//! Parameters for alignment verification.

use dental_spatial::QueryParams;

use crate::error::{AlignError, AlignResult};
use crate::report::Grade;

/// Parameters for alignment verification.
///
/// # Example
///
/// ```
/// use dental_align::{AlignParams, Grade};
///
/// let params = AlignParams::default();
/// assert_eq!(params.grade(0.005), Grade::Excellent);
/// assert_eq!(params.grade(0.02), Grade::Pass);
/// assert_eq!(params.grade(0.05), Grade::Fail);
///
/// let strict = AlignParams::new().with_thresholds(0.005, 0.02);
/// assert_eq!(strict.grade(0.02), Grade::Fail);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignParams {
    /// Mean distance strictly below this grades `Excellent`.
    pub excellent_threshold: f64,

    /// Mean distance strictly below this grades `Pass`.
    pub pass_threshold: f64,

    /// Number of sample correspondences shown by reports.
    pub sample_count: usize,

    /// Cell size of the margin-point grid used for per-vertex proximity.
    pub proximity_cell_size: f64,

    /// Spatial index parameters.
    pub query: QueryParams,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            excellent_threshold: 0.01,
            pass_threshold: 0.05,
            sample_count: 5,
            proximity_cell_size: 2.0,
            query: QueryParams::default(),
        }
    }
}

impl AlignParams {
    /// Default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both grade thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, excellent: f64, pass: f64) -> Self {
        self.excellent_threshold = excellent;
        self.pass_threshold = pass;
        self
    }

    /// Set the number of sample correspondences.
    #[must_use]
    pub const fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Set the proximity grid cell size.
    #[must_use]
    pub const fn with_proximity_cell_size(mut self, size: f64) -> Self {
        self.proximity_cell_size = size;
        self
    }

    /// Set the spatial index parameters.
    #[must_use]
    pub const fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Check thresholds and cell size.
    ///
    /// # Errors
    ///
    /// [`AlignError::InvalidThresholds`] unless `0 < excellent <= pass` and
    /// both are finite; [`AlignError::InvalidCellSize`] for a non-positive or
    /// non-finite cell size.
    pub fn validate(&self) -> AlignResult<()> {
        let (excellent, pass) = (self.excellent_threshold, self.pass_threshold);
        if !(excellent.is_finite() && pass.is_finite() && excellent > 0.0 && excellent <= pass) {
            return Err(AlignError::InvalidThresholds { excellent, pass });
        }
        if !(self.proximity_cell_size.is_finite() && self.proximity_cell_size > 0.0) {
            return Err(AlignError::InvalidCellSize(self.proximity_cell_size));
        }
        Ok(())
    }

    /// Grade a mean distance.
    #[must_use]
    pub fn grade(&self, mean: f64) -> Grade {
        if mean < self.excellent_threshold {
            Grade::Excellent
        } else if mean < self.pass_threshold {
            Grade::Pass
        } else {
            Grade::Fail
        }
    }
}
