//! Parameters for case processing.

use dental_align::AlignParams;
use dental_classify::ClassifyParams;

use crate::error::PipelineResult;

/// Parameters for [`process_case`](crate::process_case) and
/// [`process_cases`](crate::process_cases).
///
/// # Example
///
/// ```
/// use dental::PipelineParams;
/// use dental::classify::ClassifyParams;
///
/// let params = PipelineParams::new()
///     .with_classify(ClassifyParams::new().with_prune_radius(20.0))
///     .with_verification(false);
/// assert!(params.classify_vertices);
/// assert!(!params.verify);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineParams {
    /// Alignment verification parameters.
    pub align: AlignParams,
    /// Vertex classification parameters.
    pub classify: ClassifyParams,
    /// Run alignment verification.
    pub verify: bool,
    /// Run vertex classification.
    pub classify_vertices: bool,
    /// Fail a case if any tooth transform cannot be used.
    pub strict: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            align: AlignParams::default(),
            classify: ClassifyParams::default(),
            verify: true,
            classify_vertices: true,
            strict: false,
        }
    }
}

impl PipelineParams {
    /// Default parameters: verify and classify, lenient.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set alignment parameters.
    #[must_use]
    pub const fn with_align(mut self, align: AlignParams) -> Self {
        self.align = align;
        self
    }

    /// Set classification parameters.
    #[must_use]
    pub const fn with_classify(mut self, classify: ClassifyParams) -> Self {
        self.classify = classify;
        self
    }

    /// Enable or disable alignment verification.
    #[must_use]
    pub const fn with_verification(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }

    /// Enable or disable vertex classification.
    #[must_use]
    pub const fn with_classification(mut self, enabled: bool) -> Self {
        self.classify_vertices = enabled;
        self
    }

    /// Enable or disable strict mode.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Validate the parameters of every enabled stage.
    ///
    /// # Errors
    ///
    /// Returns the first stage error found.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.verify {
            self.align.validate()?;
        }
        if self.classify_vertices {
            self.classify.validate()?;
        }
        Ok(())
    }
}
