//! Result types for vertex classification.

use std::fmt;

use dental_transform::TransformError;
use dental_types::{ToothNumber, VertexLabel};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happened to one tooth during classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ToothOutcome {
    /// Claims were computed.
    Classified {
        /// The tooth.
        tooth: ToothNumber,
        /// Vertices inside the prune radius.
        candidates: usize,
        /// Candidates inside the margin footprint.
        in_footprint: usize,
        /// Footprint vertices above the margin.
        tooth_claims: usize,
        /// Footprint vertices at or below the margin.
        gum_claims: usize,
    },
    /// Margin too short to define a footprint.
    Skipped {
        /// The tooth.
        tooth: ToothNumber,
        /// Number of margin points present.
        margin_points: usize,
    },
    /// The transform could not be inverted.
    Failed {
        /// The tooth.
        tooth: ToothNumber,
        /// Why.
        error: TransformError,
    },
}

impl ToothOutcome {
    /// The tooth this outcome belongs to.
    #[must_use]
    pub const fn tooth(&self) -> ToothNumber {
        match self {
            Self::Classified { tooth, .. } | Self::Skipped { tooth, .. } | Self::Failed { tooth, .. } => {
                *tooth
            }
        }
    }

    /// True if claims were computed.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        matches!(self, Self::Classified { .. })
    }
}

impl fmt::Display for ToothOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classified {
                tooth,
                candidates,
                in_footprint,
                tooth_claims,
                gum_claims,
            } => write!(
                f,
                "Tooth {tooth}: {candidates} nearby, {in_footprint} in footprint \
                 ({tooth_claims} tooth, {gum_claims} gum)"
            ),
            Self::Skipped {
                tooth,
                margin_points,
            } => write!(f, "Tooth {tooth}: skipped ({margin_points} margin points)"),
            Self::Failed { tooth, error } => write!(f, "Tooth {tooth}: failed ({error})"),
        }
    }
}

/// Label counts over a label array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelSummary {
    /// Vertices labelled tooth.
    pub tooth: usize,
    /// Vertices labelled gum.
    pub gum: usize,
    /// Vertices left unlabelled.
    pub unlabeled: usize,
}

impl LabelSummary {
    /// Count labels.
    #[must_use]
    pub fn of(labels: &[VertexLabel]) -> Self {
        labels.iter().fold(Self::default(), |mut s, label| {
            match label {
                VertexLabel::Tooth => s.tooth += 1,
                VertexLabel::Gum => s.gum += 1,
                VertexLabel::Unlabeled => s.unlabeled += 1,
            }
            s
        })
    }

    /// Total number of vertices.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.tooth + self.gum + self.unlabeled
    }

    /// Share of labelled vertices in percent (0 for an empty mesh).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn labeled_percent(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            100.0 * (self.tooth + self.gum) as f64 / total as f64
        }
    }
}

impl fmt::Display for LabelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tooth, {} gum, {} unlabeled ({:.1}% labeled)",
            self.tooth,
            self.gum,
            self.unlabeled,
            self.labeled_percent()
        )
    }
}

/// Labels for every mesh vertex plus per-tooth bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Classification {
    /// One label per mesh vertex, indexed like the mesh.
    pub labels: Vec<VertexLabel>,
    /// One outcome per input tooth, in input order.
    pub outcomes: Vec<ToothOutcome>,
    /// Counts over `labels`.
    pub summary: LabelSummary,
}

impl Classification {
    /// Labels as integer codes (`0` unlabeled, `1` tooth, `2` gum).
    #[must_use]
    pub fn label_codes(&self) -> Vec<u8> {
        self.labels.iter().map(|l| l.code()).collect()
    }

    /// Indices of vertices carrying `label`, ascending.
    #[must_use]
    pub fn vertices_with(&self, label: VertexLabel) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, l)| *l == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Outcomes of teeth that could not be classified.
    pub fn unclassified(&self) -> impl Iterator<Item = &ToothOutcome> {
        self.outcomes.iter().filter(|o| !o.is_classified())
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vertex Classification:")?;
        writeln!(f, "  Vertices: {}", self.labels.len())?;
        writeln!(f, "  Labels: {}", self.summary)?;
        for outcome in &self.outcomes {
            writeln!(f, "  {outcome}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dental_types::VertexLabel::{Gum, Tooth, Unlabeled};

    #[test]
    fn test_summary() {
        let s = LabelSummary::of(&[Tooth, Gum, Gum, Unlabeled]);
        assert_eq!(
            s,
            LabelSummary {
                tooth: 1,
                gum: 2,
                unlabeled: 1
            }
        );
        assert_eq!(s.total(), 4);
        assert!((s.labeled_percent() - 75.0).abs() < 1e-12);
        assert!(LabelSummary::default().labeled_percent().abs() < f64::EPSILON);
        assert!(s.to_string().contains("75.0% labeled"));
    }

    #[test]
    fn test_classification_accessors() {
        let labels = vec![Tooth, Unlabeled, Gum, Tooth];
        let c = Classification {
            summary: LabelSummary::of(&labels),
            labels,
            outcomes: vec![ToothOutcome::Skipped {
                tooth: ToothNumber::new(12).unwrap(),
                margin_points: 2,
            }],
        };
        assert_eq!(c.label_codes(), vec![1, 0, 2, 1]);
        assert_eq!(c.vertices_with(Tooth), vec![0, 3]);
        assert_eq!(c.unclassified().count(), 1);
        assert!(c.to_string().contains("Tooth 12: skipped (2 margin points)"));
    }
}
