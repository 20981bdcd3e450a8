//! Build parameters for spatial indices.

/// Parameters for [`BvhQuery`](crate::BvhQuery) construction and batch queries.
///
/// # Example
///
/// ```
/// use dental_spatial::QueryParams;
///
/// let params = QueryParams::new().with_max_leaf_size(4).with_parallel(false);
/// assert_eq!(params.max_leaf_size, 4);
/// assert!(!params.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParams {
    /// Maximum primitives per BVH leaf.
    pub max_leaf_size: usize,

    /// Run batch queries on the rayon pool.
    pub parallel: bool,

    /// Batches smaller than this run on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            max_leaf_size: 8,
            parallel: true,
            parallel_threshold: 256,
        }
    }
}

impl QueryParams {
    /// Default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum leaf size (clamped to at least 1 at build time).
    #[must_use]
    pub const fn with_max_leaf_size(mut self, size: usize) -> Self {
        self.max_leaf_size = size;
        self
    }

    /// Enable or disable parallel batch queries.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the batch size below which queries stay sequential.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// True if a batch of `len` points should use the rayon pool.
    #[must_use]
    pub const fn use_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.parallel_threshold
    }
}
