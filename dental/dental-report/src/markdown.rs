//! Markdown case and batch reports.

use std::fmt;

use dental_align::{CaseVerification, Verification};
use dental_classify::{Classification, ToothOutcome};

use crate::options::ReportOptions;
use crate::text::format_point;

/// Markdown report for one case.
///
/// Sections are emitted only for the results that were attached.
///
/// # Example
///
/// ```
/// use dental_align::CaseVerification;
/// use dental_report::MarkdownReport;
///
/// let verification = CaseVerification::default();
/// let md = MarkdownReport::new("case-001")
///     .with_verification(&verification)
///     .to_string();
/// assert!(md.starts_with("# case-001\n"));
/// assert!(md.contains("## Alignment"));
/// assert!(!md.contains("## Vertex Labels"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarkdownReport<'a> {
    title: &'a str,
    verification: Option<&'a CaseVerification>,
    classification: Option<&'a Classification>,
    options: ReportOptions,
}

impl<'a> MarkdownReport<'a> {
    /// Empty report with a title.
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            verification: None,
            classification: None,
            options: ReportOptions::default(),
        }
    }

    /// Attach alignment results.
    #[must_use]
    pub const fn with_verification(mut self, verification: &'a CaseVerification) -> Self {
        self.verification = Some(verification);
        self
    }

    /// Attach classification results.
    #[must_use]
    pub const fn with_classification(mut self, classification: &'a Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Replace the formatting options.
    #[must_use]
    pub const fn with_options(mut self, options: ReportOptions) -> Self {
        self.options = options;
        self
    }

    fn write_alignment(&self, f: &mut fmt::Formatter<'_>, v: &CaseVerification) -> fmt::Result {
        let p = self.options.precision;

        writeln!(f, "## Alignment")?;
        writeln!(f)?;
        writeln!(f, "| Tooth | Points | Mean (mm) | Max (mm) | Std (mm) | Grade |")?;
        writeln!(f, "|---|---|---|---|---|---|")?;
        for verification in &v.verifications {
            match verification {
                Verification::Verified(r) => writeln!(
                    f,
                    "| {} | {} | {:.p$} | {:.p$} | {:.p$} | {} |",
                    r.tooth,
                    r.point_count(),
                    r.mean,
                    r.max,
                    r.std_dev,
                    r.grade
                )?,
                Verification::NotVerifiable { tooth, reason } => {
                    writeln!(f, "| {tooth} | 0 | - | - | - | not verifiable ({reason}) |")?;
                }
            }
        }
        writeln!(f)?;

        let (e, pass, fail) = v.grade_counts();
        writeln!(
            f,
            "**Grades**: {e} excellent, {pass} pass, {fail} fail"
        )?;
        if let Some(worst) = v.worst() {
            writeln!(
                f,
                "**Worst tooth**: {} (mean {:.p$} mm)",
                worst.tooth, worst.mean
            )?;
        }

        if !v.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "### Errors")?;
            writeln!(f)?;
            for failure in &v.failures {
                writeln!(f, "- {failure}")?;
            }
        }

        if self.options.include_samples && self.options.sample_count > 0 {
            for r in v.reports() {
                writeln!(f)?;
                writeln!(f, "### Tooth {} samples", r.tooth)?;
                writeln!(f)?;
                writeln!(f, "| # | Margin point | Surface point | Distance (mm) |")?;
                writeln!(f, "|---|---|---|---|")?;
                for c in r.samples(self.options.sample_count) {
                    writeln!(
                        f,
                        "| {} | {} | {} | {:.p$} |",
                        c.index,
                        format_point(&c.margin_point, p),
                        format_point(&c.surface_point, p),
                        c.distance
                    )?;
                }
            }
        }
        Ok(())
    }

    fn write_classification(&self, f: &mut fmt::Formatter<'_>, c: &Classification) -> fmt::Result {
        let s = &c.summary;
        let total = s.total();
        #[allow(clippy::cast_precision_loss)]
        let share = |n: usize| {
            if total == 0 {
                0.0
            } else {
                100.0 * n as f64 / total as f64
            }
        };

        writeln!(f, "## Vertex Labels")?;
        writeln!(f)?;
        writeln!(f, "| Label | Vertices | Share |")?;
        writeln!(f, "|---|---|---|")?;
        writeln!(f, "| Tooth | {} | {:.1}% |", s.tooth, share(s.tooth))?;
        writeln!(f, "| Gum | {} | {:.1}% |", s.gum, share(s.gum))?;
        writeln!(f, "| Unlabeled | {} | {:.1}% |", s.unlabeled, share(s.unlabeled))?;

        if self.options.include_outcomes && !c.outcomes.is_empty() {
            writeln!(f)?;
            writeln!(f, "| Tooth | Outcome | Candidates | In footprint | Tooth claims | Gum claims |")?;
            writeln!(f, "|---|---|---|---|---|---|")?;
            for outcome in &c.outcomes {
                match outcome {
                    ToothOutcome::Classified {
                        tooth,
                        candidates,
                        in_footprint,
                        tooth_claims,
                        gum_claims,
                    } => writeln!(
                        f,
                        "| {tooth} | classified | {candidates} | {in_footprint} | {tooth_claims} | {gum_claims} |"
                    )?,
                    ToothOutcome::Skipped {
                        tooth,
                        margin_points,
                    } => writeln!(
                        f,
                        "| {tooth} | skipped ({margin_points} margin points) | - | - | - | - |"
                    )?,
                    ToothOutcome::Failed { tooth, error } => {
                        writeln!(f, "| {tooth} | failed: {error} | - | - | - | - |")?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        if let Some(v) = self.verification {
            writeln!(f)?;
            self.write_alignment(f, v)?;
        }
        if let Some(c) = self.classification {
            writeln!(f)?;
            self.write_classification(f, c)?;
        }
        Ok(())
    }
}

/// One line of a [`BatchTable`].
#[derive(Debug, Clone, Copy)]
pub struct BatchRow<'a> {
    /// Case identifier.
    pub id: &'a str,
    /// Alignment results, if the case got that far.
    pub verification: Option<&'a CaseVerification>,
    /// Classification results, if the case got that far.
    pub classification: Option<&'a Classification>,
    /// Error that stopped the case, if any.
    pub error: Option<&'a str>,
}

/// Markdown overview table across many cases.
///
/// # Example
///
/// ```
/// use dental_report::{BatchRow, BatchTable};
///
/// let rows = [BatchRow {
///     id: "case-7",
///     verification: None,
///     classification: None,
///     error: Some("invalid parameter"),
/// }];
/// let md = BatchTable::new(&rows).to_string();
/// assert!(md.contains("| case-7 | - | - | - | - | - | error: invalid parameter |"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchTable<'a> {
    rows: &'a [BatchRow<'a>],
}

impl<'a> BatchTable<'a> {
    /// Table over `rows`, in order.
    #[must_use]
    pub const fn new(rows: &'a [BatchRow<'a>]) -> Self {
        Self { rows }
    }
}

impl fmt::Display for BatchTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Batch Summary")?;
        writeln!(f)?;
        writeln!(f, "**Total Cases**: {}", self.rows.len())?;
        writeln!(f)?;
        writeln!(f, "| Case | Excellent | Pass | Fail | Tooth vertices | Gum vertices | Status |")?;
        writeln!(f, "|---|---|---|---|---|---|---|")?;
        for row in self.rows {
            let grades = row.verification.map_or_else(
                || "- | - | -".to_string(),
                |v| {
                    let (e, p, fail) = v.grade_counts();
                    format!("{e} | {p} | {fail}")
                },
            );
            let labels = row.classification.map_or_else(
                || "- | -".to_string(),
                |c| format!("{} | {}", c.summary.tooth, c.summary.gum),
            );
            let status = match row.error {
                Some(error) => format!("error: {error}"),
                None if row.verification.is_some_and(|v| !v.all_acceptable()) => {
                    "needs review".to_string()
                }
                None => "ok".to_string(),
            };
            writeln!(f, "| {} | {grades} | {labels} | {status} |", row.id)?;
        }
        Ok(())
    }
}
