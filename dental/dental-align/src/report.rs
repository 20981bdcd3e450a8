//! Result types for alignment verification.

use std::fmt;

use dental_types::{Point3, ToothNumber};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// Quality grade of an alignment, from the mean margin-to-surface distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Grade {
    /// Mean distance below the excellent threshold.
    Excellent,
    /// Mean distance below the pass threshold.
    Pass,
    /// Everything else.
    Fail,
}

impl Grade {
    /// True for `Excellent` and `Pass`.
    #[must_use]
    pub const fn is_acceptable(self) -> bool {
        !matches!(self, Self::Fail)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => f.write_str("EXCELLENT"),
            Self::Pass => f.write_str("PASS"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}

/// One margin point with its closest surface point, both in scanner space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correspondence {
    /// Index of the margin point.
    pub index: usize,
    /// Margin point mapped to scanner space.
    pub margin_point: Point3<f64>,
    /// Closest point on the scan surface.
    pub surface_point: Point3<f64>,
    /// Distance between the two.
    pub distance: f64,
}

/// Distance statistics for one tooth's margin against the scan surface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistanceReport {
    /// Tooth the margin belongs to.
    pub tooth: ToothNumber,
    /// One distance per margin point, in margin order.
    pub distances: Vec<f64>,
    /// Margin points in scanner space.
    pub scanner_margin: Vec<Point3<f64>>,
    /// Closest surface point for each margin point.
    pub closest_points: Vec<Point3<f64>>,
    /// Mean distance.
    pub mean: f64,
    /// Largest distance.
    pub max: f64,
    /// Smallest distance.
    pub min: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Grade of `mean`.
    pub grade: Grade,
}

impl DistanceReport {
    /// Number of margin points measured.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.distances.len()
    }

    /// Up to `count` correspondences spread evenly along the margin.
    ///
    /// ```
    /// use dental_align::{DistanceReport, Grade};
    /// use dental_types::{Point3, ToothNumber};
    ///
    /// let report = DistanceReport {
    ///     tooth: ToothNumber::new(11).unwrap(),
    ///     distances: vec![0.0; 10],
    ///     scanner_margin: vec![Point3::origin(); 10],
    ///     closest_points: vec![Point3::origin(); 10],
    ///     mean: 0.0,
    ///     max: 0.0,
    ///     min: 0.0,
    ///     std_dev: 0.0,
    ///     grade: Grade::Excellent,
    /// };
    /// let idx: Vec<usize> = report.samples(5).iter().map(|c| c.index).collect();
    /// assert_eq!(idx, vec![0, 2, 4, 6, 8]);
    /// ```
    #[must_use]
    pub fn samples(&self, count: usize) -> Vec<Correspondence> {
        let n = self.distances.len();
        if n == 0 || count == 0 {
            return Vec::new();
        }
        let count = count.min(n);
        (0..count)
            .map(|k| k * n / count)
            .map(|index| Correspondence {
                index,
                margin_point: self.scanner_margin[index],
                surface_point: self.closest_points[index],
                distance: self.distances[index],
            })
            .collect()
    }

    /// Index and value of the largest distance.
    #[must_use]
    pub fn worst_point(&self) -> Option<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl fmt::Display for DistanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tooth {}: {} points, mean {:.4}, max {:.4}, std {:.4} [{}]",
            self.tooth,
            self.point_count(),
            self.mean,
            self.max,
            self.std_dev,
            self.grade
        )
    }
}

/// Why a tooth could not be verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NotVerifiableReason {
    /// The tooth has no margin points (typically a pontic).
    EmptyMargin,
    /// The scan mesh has no vertices.
    EmptyMesh,
}

impl fmt::Display for NotVerifiableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMargin => f.write_str("no margin points"),
            Self::EmptyMesh => f.write_str("empty mesh"),
        }
    }
}

/// Outcome of verifying one tooth.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verification {
    /// Distances were measured.
    Verified(DistanceReport),
    /// Nothing to measure; not an error.
    NotVerifiable {
        /// Affected tooth.
        tooth: ToothNumber,
        /// Why nothing was measured.
        reason: NotVerifiableReason,
    },
}

impl Verification {
    /// The tooth this outcome belongs to.
    #[must_use]
    pub const fn tooth(&self) -> ToothNumber {
        match self {
            Self::Verified(report) => report.tooth,
            Self::NotVerifiable { tooth, .. } => *tooth,
        }
    }

    /// The distance report, if distances were measured.
    #[must_use]
    pub const fn report(&self) -> Option<&DistanceReport> {
        match self {
            Self::Verified(report) => Some(report),
            Self::NotVerifiable { .. } => None,
        }
    }

    /// The grade, if distances were measured.
    #[must_use]
    pub fn grade(&self) -> Option<Grade> {
        self.report().map(|r| r.grade)
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified(report) => write!(f, "{report}"),
            Self::NotVerifiable { tooth, reason } => {
                write!(f, "Tooth {tooth}: not verifiable ({reason})")
            }
        }
    }
}

/// Verification of every tooth of a case against one mesh.
#[derive(Debug, Clone, Default)]
pub struct CaseVerification {
    /// Per-tooth outcomes, in input order.
    pub verifications: Vec<Verification>,
    /// Teeth whose transform could not be used.
    pub failures: Vec<AlignError>,
}

impl CaseVerification {
    /// Reports of teeth with measured distances.
    pub fn reports(&self) -> impl Iterator<Item = &DistanceReport> {
        self.verifications.iter().filter_map(Verification::report)
    }

    /// Number of reports with each grade: `(excellent, pass, fail)`.
    #[must_use]
    pub fn grade_counts(&self) -> (usize, usize, usize) {
        self.reports().fold((0, 0, 0), |(e, p, f), r| match r.grade {
            Grade::Excellent => (e + 1, p, f),
            Grade::Pass => (e, p + 1, f),
            Grade::Fail => (e, p, f + 1),
        })
    }

    /// The report with the largest mean distance.
    #[must_use]
    pub fn worst(&self) -> Option<&DistanceReport> {
        self.reports().max_by(|a, b| a.mean.total_cmp(&b.mean))
    }

    /// True if every measured tooth is acceptable and nothing failed.
    #[must_use]
    pub fn all_acceptable(&self) -> bool {
        self.failures.is_empty() && self.reports().all(|r| r.grade.is_acceptable())
    }
}

impl fmt::Display for CaseVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alignment Verification:")?;
        for verification in &self.verifications {
            writeln!(f, "  {verification}")?;
        }
        for failure in &self.failures {
            writeln!(f, "  error: {failure}")?;
        }
        let (e, p, fail) = self.grade_counts();
        writeln!(f, "  Grades: {e} excellent, {p} pass, {fail} fail")
    }
}

/// Per-vertex distance to the closest scanner-space margin point.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MarginProximity {
    /// Distance per mesh vertex; infinite if no tooth contributed a margin.
    pub distances: Vec<f64>,
    /// Tooth owning the closest margin point, per mesh vertex.
    pub nearest_tooth: Vec<Option<ToothNumber>>,
}

impl MarginProximity {
    /// Vertices within `radius` of some margin, ascending.
    #[must_use]
    pub fn vertices_within(&self, radius: f64) -> Vec<usize> {
        self.distances
            .iter()
            .enumerate()
            .filter(|&(_, d)| *d < radius)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn report(tooth: u8, distances: Vec<f64>, grade: Grade) -> DistanceReport {
        let n = distances.len();
        #[allow(clippy::cast_precision_loss)]
        let mean = distances.iter().sum::<f64>() / n.max(1) as f64;
        DistanceReport {
            tooth: ToothNumber::new(tooth).unwrap(),
            max: distances.iter().copied().fold(0.0, f64::max),
            min: distances.iter().copied().fold(f64::INFINITY, f64::min),
            distances,
            scanner_margin: vec![Point3::origin(); n],
            closest_points: vec![Point3::origin(); n],
            mean,
            std_dev: 0.0,
            grade,
        }
    }

    #[test]
    fn test_samples() {
        let r = report(11, vec![0.0, 1.0, 2.0], Grade::Fail);
        assert_eq!(r.samples(5).len(), 3);
        assert!(r.samples(0).is_empty());
        assert_eq!(r.samples(1)[0].index, 0);
        assert!(report(11, vec![], Grade::Excellent).samples(3).is_empty());
    }

    #[test]
    fn test_worst_point() {
        let r = report(11, vec![0.1, 0.7, 0.3], Grade::Fail);
        assert_eq!(r.worst_point(), Some((1, 0.7)));
    }

    #[test]
    fn test_case_summary() {
        let case = CaseVerification {
            verifications: vec![
                Verification::Verified(report(11, vec![0.001], Grade::Excellent)),
                Verification::Verified(report(12, vec![0.02], Grade::Pass)),
                Verification::Verified(report(13, vec![1.5], Grade::Fail)),
                Verification::NotVerifiable {
                    tooth: ToothNumber::new(14).unwrap(),
                    reason: NotVerifiableReason::EmptyMargin,
                },
            ],
            failures: Vec::new(),
        };
        assert_eq!(case.grade_counts(), (1, 1, 1));
        assert_eq!(case.worst().map(|r| r.tooth.get()), Some(13));
        assert!(!case.all_acceptable());

        let text = case.to_string();
        assert!(text.contains("Tooth 14: not verifiable (no margin points)"));
        assert!(text.contains("[FAIL]"));
    }

    #[test]
    fn test_grade_display_and_acceptable() {
        assert_eq!(Grade::Excellent.to_string(), "EXCELLENT");
        assert!(Grade::Pass.is_acceptable());
        assert!(!Grade::Fail.is_acceptable());
    }

    #[test]
    fn test_vertices_within() {
        let p = MarginProximity {
            distances: vec![0.0, 5.0, f64::INFINITY, 0.5],
            nearest_tooth: vec![None; 4],
        };
        assert_eq!(p.vertices_within(1.0), vec![0, 3]);
    }
}
