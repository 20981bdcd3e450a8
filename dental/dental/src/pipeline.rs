//! Per-case and batch processing.

use std::fmt;

use dental_align::{CaseVerification, verify_case};
use dental_classify::{Classification, classify_case};
use dental_report::{BatchRow, BatchTable, MarkdownReport, ReportOptions};
use dental_types::{Case, Jaw, JawCoverage};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::params::PipelineParams;

/// Everything computed for one case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// Case identifier.
    pub id: String,
    /// Jaw of the scan mesh.
    pub jaw: Jaw,
    /// Jaw coverage of all tooth records in the case.
    pub coverage: JawCoverage,
    /// Number of mesh vertices.
    pub vertex_count: usize,
    /// Teeth of the mesh's jaw without margin geometry.
    pub missing_margins: usize,
    /// Alignment results, if verification ran.
    pub verification: Option<CaseVerification>,
    /// Vertex labels, if classification ran.
    pub classification: Option<Classification>,
}

impl CaseReport {
    /// True if every verified tooth is acceptable and no tooth failed.
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.verification
            .as_ref()
            .is_none_or(CaseVerification::all_acceptable)
    }

    /// Render as Markdown.
    #[must_use]
    pub fn to_markdown(&self, options: ReportOptions) -> String {
        let mut report = MarkdownReport::new(&self.id).with_options(options);
        if let Some(v) = &self.verification {
            report = report.with_verification(v);
        }
        if let Some(c) = &self.classification {
            report = report.with_classification(c);
        }
        report.to_string()
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Case {} ({} jaw, {} vertices)", self.id, self.jaw, self.vertex_count)?;
        if self.missing_margins > 0 {
            writeln!(f, "  Missing margins: {}", self.missing_margins)?;
        }
        if let Some(v) = &self.verification {
            write!(f, "{v}")?;
        }
        if let Some(c) = &self.classification {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Results of [`process_cases`], in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Cases that completed.
    pub reports: Vec<CaseReport>,
    /// Cases that failed, each tagged with its identifier.
    pub failures: Vec<PipelineError>,
}

impl BatchReport {
    /// Number of cases processed, including failures.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    /// Render the batch overview table as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let errors: Vec<(String, String)> = self
            .failures
            .iter()
            .map(|e| match e {
                PipelineError::Case { id, source } => (id.clone(), source.to_string()),
                other => (String::from("?"), other.to_string()),
            })
            .collect();

        let rows: Vec<BatchRow<'_>> = self
            .reports
            .iter()
            .map(|r| BatchRow {
                id: &r.id,
                verification: r.verification.as_ref(),
                classification: r.classification.as_ref(),
                error: None,
            })
            .chain(errors.iter().map(|(id, error)| BatchRow {
                id,
                verification: None,
                classification: None,
                error: Some(error),
            }))
            .collect();

        BatchTable::new(&rows).to_string()
    }
}

/// Verify and classify one case.
///
/// Only teeth of the mesh's jaw take part. Tooth-level problems (missing
/// margins, singular transforms) are recorded in the report; in strict mode
/// a singular transform fails the whole case.
///
/// # Errors
///
/// Returns [`PipelineError`] if `params` are invalid, or in strict mode if a
/// tooth transform failed.
///
/// # Example
///
/// ```
/// use dental::{process_case, PipelineParams};
/// use dental::types::{Case, Jaw, Point3, ScanMesh};
///
/// let mesh = ScanMesh::point_cloud(vec![Point3::origin()]);
/// let case = Case::new("case-001", Jaw::Upper, mesh);
/// let report = process_case(&case, &PipelineParams::default()).unwrap();
/// assert_eq!(report.vertex_count, 1);
/// assert!(report.is_acceptable());
/// ```
pub fn process_case(case: &Case, params: &PipelineParams) -> PipelineResult<CaseReport> {
    params.validate()?;
    run_case(case, params)
}

/// Process many cases in parallel.
///
/// Cases share nothing; a case that fails is recorded in
/// [`BatchReport::failures`] and the others continue.
///
/// # Errors
///
/// Returns [`PipelineError`] if `params` are invalid. No case is processed.
pub fn process_cases(cases: &[Case], params: &PipelineParams) -> PipelineResult<BatchReport> {
    params.validate()?;

    info!(cases = cases.len(), "processing case batch");

    let results: Vec<PipelineResult<CaseReport>> = cases
        .par_iter()
        .map(|case| run_case(case, params).map_err(|e| e.in_case(case.id.clone())))
        .collect();

    let mut batch = BatchReport::default();
    for result in results {
        match result {
            Ok(report) => batch.reports.push(report),
            Err(e) => {
                warn!(error = %e, "case failed");
                batch.failures.push(e);
            }
        }
    }

    info!(
        completed = batch.reports.len(),
        failed = batch.failures.len(),
        "case batch complete"
    );
    Ok(batch)
}

fn run_case(case: &Case, params: &PipelineParams) -> PipelineResult<CaseReport> {
    let verification = params.verify.then(|| verify_case(case, &params.align));

    if let Some(v) = verification
        .as_ref()
        .filter(|v| params.strict && !v.failures.is_empty())
    {
        return Err(PipelineError::ToothFailures {
            count: v.failures.len(),
            first: v.failures[0].clone(),
        });
    }

    let classification = if params.classify_vertices {
        Some(classify_case(case, &params.classify)?)
    } else {
        None
    };

    let missing_margins = case
        .teeth_for_jaw()
        .filter(|t| !t.margin().has_geometry())
        .count();

    Ok(CaseReport {
        id: case.id.clone(),
        jaw: case.jaw,
        coverage: case.jaw_coverage(),
        vertex_count: case.mesh.vertex_count(),
        missing_margins,
        verification,
        classification,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use dental_transform::DesignTransform;
    use dental_types::{Point3, ScanMesh, Tooth, VertexLabel};

    fn ring(r: f64, z: f64) -> Vec<Point3<f64>> {
        (0..8)
            .map(|k| {
                let t = std::f64::consts::TAU * f64::from(k) / 8.0;
                Point3::new(r * t.cos(), r * t.sin(), z)
            })
            .collect()
    }

    fn case(id: &str) -> Case {
        // Margin ring lies exactly on the cloud's outer ring.
        let mut cloud = ring(5.0, 0.0);
        cloud.push(Point3::new(0.0, 0.0, 1.0));
        cloud.push(Point3::new(0.0, 0.0, -1.0));
        Case::new(id, Jaw::Upper, ScanMesh::point_cloud(cloud))
            .with_tooth(Tooth::new(11).unwrap().with_margin(ring(5.0, 0.0)))
            .with_tooth(Tooth::new(12).unwrap())
    }

    fn broken(id: &str) -> Case {
        case(id).with_tooth(
            Tooth::new(13)
                .unwrap()
                .with_margin(ring(5.0, 0.0))
                .with_transform(DesignTransform::from_cells([(0, 0, 0.0)]).unwrap()),
        )
    }

    #[test]
    fn test_process_case() {
        let report = process_case(&case("a"), &PipelineParams::default()).unwrap();
        assert_eq!(report.vertex_count, 10);
        assert_eq!(report.missing_margins, 1);
        assert_eq!(report.coverage, JawCoverage::Upper);

        let v = report.verification.as_ref().unwrap();
        assert_eq!(v.grade_counts(), (1, 0, 0));

        let c = report.classification.as_ref().unwrap();
        assert_eq!(c.labels[8], VertexLabel::Tooth);
        assert_eq!(c.labels[9], VertexLabel::Gum);
        assert!(report.is_acceptable());
        assert!(report.to_string().starts_with("Case a (upper jaw, 10 vertices)"));
    }

    #[test]
    fn test_stages_can_be_disabled() {
        let params = PipelineParams::new().with_verification(false);
        let report = process_case(&case("a"), &params).unwrap();
        assert!(report.verification.is_none());
        assert!(report.classification.is_some());
    }

    #[test]
    fn test_lenient_and_strict() {
        let report = process_case(&broken("b"), &PipelineParams::default()).unwrap();
        assert!(!report.is_acceptable());
        assert_eq!(report.verification.unwrap().failures.len(), 1);

        let err = process_case(&broken("b"), &PipelineParams::new().with_strict(true)).unwrap_err();
        assert!(matches!(err, PipelineError::ToothFailures { count: 1, .. }));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let cases = vec![case("a"), broken("b"), case("c")];
        let batch = process_cases(&cases, &PipelineParams::new().with_strict(true)).unwrap();
        assert_eq!(batch.case_count(), 3);
        let ids: Vec<&str> = batch.reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(batch.failures[0].case_id(), Some("b"));

        let md = batch.to_markdown();
        assert!(md.contains("| a | 1 | 0 | 0 | 1 | 9 | ok |"));
        assert!(md.contains("| b | - | - | - | - | - | error: 1 tooth transform(s) failed"));
    }

    #[test]
    fn test_invalid_params_stop_batch() {
        let params = PipelineParams::new()
            .with_classify(dental_classify::ClassifyParams::new().with_footprint_buffer(f64::NAN));
        assert!(process_cases(&[case("a")], &params).is_err());
    }
}
