//! Parameters for vertex classification.

use crate::error::{ClassifyError, ClassifyResult};

/// Parameters for [`classify_vertices`](crate::classify_vertices).
///
/// # Example
///
/// ```
/// use dental_classify::ClassifyParams;
///
/// let params = ClassifyParams::default();
/// assert!((params.prune_radius - 15.0).abs() < f64::EPSILON);
/// assert!((params.footprint_buffer - 1.2).abs() < f64::EPSILON);
///
/// let wide = ClassifyParams::new().with_prune_radius(20.0).with_parallel(false);
/// assert!(wide.validate().is_ok());
/// assert!(ClassifyParams::new().with_footprint_buffer(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyParams {
    /// Scanner-space radius around the margin centroid; vertices strictly
    /// inside are candidates (mm).
    pub prune_radius: f64,

    /// Footprint radius as a multiple of the margin's largest planar radius.
    pub footprint_buffer: f64,

    /// Compute per-tooth claims on the rayon pool.
    pub parallel: bool,
}

impl Default for ClassifyParams {
    fn default() -> Self {
        Self {
            prune_radius: 15.0,
            footprint_buffer: 1.2,
            parallel: true,
        }
    }
}

impl ClassifyParams {
    /// Default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prune radius.
    #[must_use]
    pub const fn with_prune_radius(mut self, radius: f64) -> Self {
        self.prune_radius = radius;
        self
    }

    /// Set the footprint buffer factor.
    #[must_use]
    pub const fn with_footprint_buffer(mut self, buffer: f64) -> Self {
        self.footprint_buffer = buffer;
        self
    }

    /// Enable or disable parallel per-tooth work.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that radius and buffer are finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> ClassifyResult<()> {
        for (name, value) in [
            ("prune_radius", self.prune_radius),
            ("footprint_buffer", self.footprint_buffer),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ClassifyError::invalid_parameter(name, value));
            }
        }
        Ok(())
    }
}
