//! Formatting options.

/// Options shared by all report renderers.
///
/// # Example
///
/// ```
/// use dental_report::ReportOptions;
///
/// let opts = ReportOptions::default();
/// assert_eq!(opts.sample_count, 5);
/// assert_eq!(opts.precision, 6);
///
/// let terse = ReportOptions::new().with_samples(false).with_precision(3);
/// assert!(!terse.include_samples);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Number of sample correspondences shown per tooth.
    pub sample_count: usize,
    /// Decimal places for distances and coordinates.
    pub precision: usize,
    /// Show sample correspondences at all.
    pub include_samples: bool,
    /// Show per-tooth classification outcomes.
    pub include_outcomes: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sample_count: 5,
            precision: 6,
            include_samples: true,
            include_outcomes: true,
        }
    }
}

impl ReportOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sample correspondences.
    #[must_use]
    pub const fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    /// Set the number of decimal places.
    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Show or hide sample correspondences.
    #[must_use]
    pub const fn with_samples(mut self, include: bool) -> Self {
        self.include_samples = include;
        self
    }

    /// Show or hide per-tooth classification outcomes.
    #[must_use]
    pub const fn with_outcomes(mut self, include: bool) -> Self {
        self.include_outcomes = include;
        self
    }
}
