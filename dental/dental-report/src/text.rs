//! Plain-text alignment summaries.

use std::fmt;

use dental_align::DistanceReport;
use dental_types::Point3;

use crate::options::ReportOptions;

/// Format a point as `(x, y, z)` with `precision` decimals.
pub(crate) fn format_point(p: &Point3<f64>, precision: usize) -> String {
    format!("({:.precision$}, {:.precision$}, {:.precision$})", p.x, p.y, p.z)
}

/// Plain-text statement of how well one tooth's margin sits on the scan.
///
/// Lists the distance statistics, a few evenly spaced sample
/// correspondences and the grade.
///
/// # Example
///
/// ```
/// use dental_align::{DistanceReport, Grade};
/// use dental_report::{AlignmentProof, ReportOptions};
/// use dental_types::{Point3, ToothNumber};
///
/// let report = DistanceReport {
///     tooth: ToothNumber::new(11).unwrap(),
///     distances: vec![0.002, 0.004],
///     scanner_margin: vec![Point3::origin(); 2],
///     closest_points: vec![Point3::origin(); 2],
///     mean: 0.003,
///     max: 0.004,
///     min: 0.002,
///     std_dev: 0.001,
///     grade: Grade::Excellent,
/// };
/// let text = AlignmentProof::new(&report, ReportOptions::default()).to_string();
/// assert!(text.contains("Mean distance: 0.003000 mm"));
/// assert!(text.ends_with("Grade: EXCELLENT\n"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AlignmentProof<'a> {
    report: &'a DistanceReport,
    options: ReportOptions,
}

impl<'a> AlignmentProof<'a> {
    /// Wrap a distance report for display.
    #[must_use]
    pub const fn new(report: &'a DistanceReport, options: ReportOptions) -> Self {
        Self { report, options }
    }
}

impl fmt::Display for AlignmentProof<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.report;
        let p = self.options.precision;

        writeln!(f, "Alignment check: tooth {}", r.tooth)?;
        writeln!(
            f,
            "Checked {} margin points against the scan surface",
            r.point_count()
        )?;
        writeln!(f, "Mean distance: {:.p$} mm", r.mean)?;
        writeln!(f, "Max distance:  {:.p$} mm", r.max)?;
        writeln!(f, "Min distance:  {:.p$} mm", r.min)?;
        writeln!(f, "Std deviation: {:.p$} mm", r.std_dev)?;

        if self.options.include_samples {
            let samples = r.samples(self.options.sample_count);
            if !samples.is_empty() {
                writeln!(f, "Samples:")?;
            }
            for c in samples {
                writeln!(
                    f,
                    "  Margin Pt {}: {} -> Mesh Pt: {} | Dist: {:.p$} mm",
                    c.index,
                    format_point(&c.margin_point, p),
                    format_point(&c.surface_point, p),
                    c.distance
                )?;
            }
        }

        writeln!(f, "Grade: {}", r.grade)
    }
}
