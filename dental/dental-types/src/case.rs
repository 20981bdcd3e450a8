//! A patient case: one scan mesh and the tooth records designed on it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Jaw, ScanMesh, Tooth};

/// Which arches a list of teeth spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JawCoverage {
    /// Only upper teeth.
    Upper,
    /// Only lower teeth.
    Lower,
    /// Teeth in both arches.
    Mixed,
    /// No teeth.
    Unknown,
}

impl JawCoverage {
    /// Coverage of a tooth list.
    pub fn of<'a>(teeth: impl IntoIterator<Item = &'a Tooth>) -> Self {
        let (mut upper, mut lower) = (false, false);
        for tooth in teeth {
            match tooth.jaw() {
                Jaw::Upper => upper = true,
                Jaw::Lower => lower = true,
            }
        }
        match (upper, lower) {
            (true, true) => Self::Mixed,
            (true, false) => Self::Upper,
            (false, true) => Self::Lower,
            (false, false) => Self::Unknown,
        }
    }
}

/// One case: identifier, the scanned jaw, its mesh and the tooth records.
///
/// Tooth records may cover both arches; classification and verification
/// must only see teeth of the mesh's jaw, selected with
/// [`Case::teeth_for_jaw`].
///
/// # Example
///
/// ```
/// use dental_types::{Case, Jaw, ScanMesh, Tooth};
///
/// let case = Case::new("case-001", Jaw::Upper, ScanMesh::new())
///     .with_tooth(Tooth::new(11).unwrap())
///     .with_tooth(Tooth::new(36).unwrap());
///
/// let upper: Vec<_> = case.teeth_for_jaw().collect();
/// assert_eq!(upper.len(), 1);
/// assert_eq!(upper[0].number().get(), 11);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Case {
    /// Case identifier (usually the project file stem).
    pub id: String,
    /// Arch captured by `mesh`.
    pub jaw: Jaw,
    /// Scanner-space mesh.
    pub mesh: ScanMesh,
    /// Tooth design records, in file order.
    pub teeth: Vec<Tooth>,
}

impl Case {
    /// A case without teeth.
    #[must_use]
    pub fn new(id: impl Into<String>, jaw: Jaw, mesh: ScanMesh) -> Self {
        Self {
            id: id.into(),
            jaw,
            mesh,
            teeth: Vec::new(),
        }
    }

    /// Append a tooth record.
    #[must_use]
    pub fn with_tooth(mut self, tooth: Tooth) -> Self {
        self.teeth.push(tooth);
        self
    }

    /// Teeth belonging to the mesh's jaw, in record order.
    pub fn teeth_for_jaw(&self) -> impl Iterator<Item = &Tooth> + '_ {
        self.teeth.iter().filter(move |t| t.jaw() == self.jaw)
    }

    /// Arches spanned by all tooth records.
    #[must_use]
    pub fn jaw_coverage(&self) -> JawCoverage {
        JawCoverage::of(&self.teeth)
    }

    /// Crowns of the mesh's jaw without margin points.
    #[must_use]
    pub fn missing_margin_count(&self) -> usize {
        self.teeth_for_jaw()
            .filter(|t| {
                t.reconstruction_type() == crate::ReconstructionType::Crown && t.margin().is_empty()
            })
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ReconstructionType;
    use nalgebra::Point3;

    fn tooth(n: u8) -> Tooth {
        Tooth::new(n).unwrap()
    }

    #[test]
    fn test_teeth_for_jaw_filters_and_keeps_order() {
        let case = Case::new("c", Jaw::Lower, ScanMesh::new())
            .with_tooth(tooth(46))
            .with_tooth(tooth(11))
            .with_tooth(tooth(31));
        let numbers: Vec<u8> = case.teeth_for_jaw().map(|t| t.number().get()).collect();
        assert_eq!(numbers, vec![46, 31]);
    }

    #[test]
    fn test_jaw_coverage() {
        assert_eq!(JawCoverage::of(&Vec::<Tooth>::new()), JawCoverage::Unknown);
        assert_eq!(JawCoverage::of(&[tooth(11), tooth(25)]), JawCoverage::Upper);
        assert_eq!(JawCoverage::of(&[tooth(31)]), JawCoverage::Lower);

        let case = Case::new("c", Jaw::Upper, ScanMesh::new())
            .with_tooth(tooth(11))
            .with_tooth(tooth(41));
        assert_eq!(case.jaw_coverage(), JawCoverage::Mixed);
    }

    #[test]
    fn test_missing_margin_count() {
        let case = Case::new("c", Jaw::Upper, ScanMesh::new())
            .with_tooth(tooth(11))
            .with_tooth(tooth(12).with_margin(vec![Point3::origin()]))
            .with_tooth(tooth(13).with_reconstruction_type(ReconstructionType::Pontic))
            .with_tooth(tooth(36));
        assert_eq!(case.missing_margin_count(), 1);
    }
}
