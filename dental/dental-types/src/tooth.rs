//! Tooth design records and FDI numbering.

use std::fmt;

use dental_transform::DesignTransform;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Margin;
use crate::error::{TypesError, TypesResult};

/// Minimum margin point count for a crown to be a usable training sample.
pub const TRAINING_SAMPLE_MIN_POINTS: usize = 50;

/// Dental arch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Jaw {
    /// Maxilla: FDI quadrants 1 and 2.
    Upper,
    /// Mandible: FDI quadrants 3 and 4.
    Lower,
}

impl fmt::Display for Jaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upper => f.write_str("upper"),
            Self::Lower => f.write_str("lower"),
        }
    }
}

/// A validated FDI (ISO 3950) tooth number for the permanent dentition.
///
/// The tens digit is the quadrant (1-4), the units digit the position from
/// the midline (1-8). Jaw assignment is derived from the quadrant only.
///
/// # Example
///
/// ```
/// use dental_types::{Jaw, ToothNumber};
///
/// let n = ToothNumber::new(36).unwrap();
/// assert_eq!(n.jaw(), Jaw::Lower);
/// assert_eq!(n.quadrant(), 3);
/// assert_eq!(n.position(), 6);
///
/// assert!(ToothNumber::new(19).is_err());
/// assert!(ToothNumber::new(51).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct ToothNumber(u8);

impl ToothNumber {
    /// Validate an FDI number.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidToothNumber`] if the quadrant is not 1-4
    /// or the position is not 1-8.
    pub const fn new(number: u8) -> TypesResult<Self> {
        let quadrant = number / 10;
        let position = number % 10;
        if quadrant >= 1 && quadrant <= 4 && position >= 1 && position <= 8 {
            Ok(Self(number))
        } else {
            Err(TypesError::invalid_tooth_number(number))
        }
    }

    /// The raw FDI number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Quadrant digit (1-4).
    #[inline]
    #[must_use]
    pub const fn quadrant(self) -> u8 {
        self.0 / 10
    }

    /// Position digit (1 = central incisor, 8 = third molar).
    #[inline]
    #[must_use]
    pub const fn position(self) -> u8 {
        self.0 % 10
    }

    /// Jaw derived from the number (11-28 upper, 31-48 lower).
    #[inline]
    #[must_use]
    pub const fn jaw(self) -> Jaw {
        if self.quadrant() <= 2 { Jaw::Upper } else { Jaw::Lower }
    }

    /// True if `other` is directly adjacent in the same arch.
    ///
    /// Neighbours share a quadrant and differ by one position, or are the two
    /// central incisors on either side of the midline.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        if self.quadrant() == other.quadrant() {
            return self.position().abs_diff(other.position()) == 1;
        }
        matches!((self.0, other.0), (11, 21) | (21, 11) | (31, 41) | (41, 31))
    }
}

impl TryFrom<u8> for ToothNumber {
    type Error = TypesError;

    fn try_from(value: u8) -> TypesResult<Self> {
        Self::new(value)
    }
}

impl From<ToothNumber> for u8 {
    fn from(value: ToothNumber) -> Self {
        value.0
    }
}

impl fmt::Display for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the lab designed for a tooth position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReconstructionType {
    /// Full crown (`AnatomicWaxup`).
    #[default]
    Crown,
    /// Bridge pontic (`WaxupPontic`), usually without a margin.
    Pontic,
    /// Implant-borne restoration.
    Implant,
    /// Veneer.
    Veneer,
    /// Opposing-jaw reference.
    Antagonist,
    /// Anything not recognised.
    Other,
}

impl ReconstructionType {
    /// Map a case-file type string. Unknown strings map to [`Self::Other`].
    ///
    /// ```
    /// use dental_types::ReconstructionType;
    ///
    /// assert_eq!(ReconstructionType::from_source_str("AnatomicWaxup"), ReconstructionType::Crown);
    /// assert_eq!(ReconstructionType::from_source_str("Bracket"), ReconstructionType::Other);
    /// ```
    #[must_use]
    pub fn from_source_str(s: &str) -> Self {
        match s.trim() {
            "AnatomicWaxup" => Self::Crown,
            "WaxupPontic" => Self::Pontic,
            "Implant" => Self::Implant,
            "Veneer" => Self::Veneer,
            "Antagonist" => Self::Antagonist,
            _ => Self::Other,
        }
    }

    /// The case-file spelling.
    #[must_use]
    pub const fn source_str(self) -> &'static str {
        match self {
            Self::Crown => "AnatomicWaxup",
            Self::Pontic => "WaxupPontic",
            Self::Implant => "Implant",
            Self::Veneer => "Veneer",
            Self::Antagonist => "Antagonist",
            Self::Other => "Other",
        }
    }
}

/// One tooth's design record: number, type, margin curve and transform.
///
/// The transform maps scanner space to this tooth's design space. A record
/// loaded without a transform carries the identity.
///
/// # Example
///
/// ```
/// use dental_types::{Point3, Tooth};
///
/// let tooth = Tooth::new(11)
///     .unwrap()
///     .with_margin(vec![Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)]);
///
/// assert_eq!(tooth.margin().len(), 2);
/// assert!(!tooth.margin().has_geometry());
/// assert!(tooth.transform().is_identity(0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tooth {
    number: ToothNumber,
    reconstruction_type: ReconstructionType,
    margin: Margin,
    transform: DesignTransform,
}

impl Tooth {
    /// A crown record with an empty margin and identity transform.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::InvalidToothNumber`] for a non-FDI number.
    pub fn new(number: u8) -> TypesResult<Self> {
        Ok(Self::from_number(ToothNumber::new(number)?))
    }

    /// Same as [`Tooth::new`] for an already-validated number.
    #[must_use]
    pub fn from_number(number: ToothNumber) -> Self {
        Self {
            number,
            reconstruction_type: ReconstructionType::default(),
            margin: Margin::default(),
            transform: DesignTransform::identity(),
        }
    }

    /// Set the reconstruction type.
    #[must_use]
    pub fn with_reconstruction_type(mut self, kind: ReconstructionType) -> Self {
        self.reconstruction_type = kind;
        self
    }

    /// Set the design-space margin curve.
    #[must_use]
    pub fn with_margin(mut self, margin: impl Into<Margin>) -> Self {
        self.margin = margin.into();
        self
    }

    /// Set the scanner-to-design transform.
    #[must_use]
    pub fn with_transform(mut self, transform: DesignTransform) -> Self {
        self.transform = transform;
        self
    }

    /// FDI number.
    #[inline]
    #[must_use]
    pub const fn number(&self) -> ToothNumber {
        self.number
    }

    /// Jaw, derived from the number.
    #[inline]
    #[must_use]
    pub const fn jaw(&self) -> Jaw {
        self.number.jaw()
    }

    /// Reconstruction type.
    #[inline]
    #[must_use]
    pub const fn reconstruction_type(&self) -> ReconstructionType {
        self.reconstruction_type
    }

    /// Design-space margin curve.
    #[inline]
    #[must_use]
    pub const fn margin(&self) -> &Margin {
        &self.margin
    }

    /// Scanner-to-design transform.
    #[inline]
    #[must_use]
    pub const fn transform(&self) -> &DesignTransform {
        &self.transform
    }

    /// A crown with more than [`TRAINING_SAMPLE_MIN_POINTS`] margin points.
    #[must_use]
    pub fn is_valid_training_sample(&self) -> bool {
        self.reconstruction_type == ReconstructionType::Crown
            && self.margin.len() > TRAINING_SAMPLE_MIN_POINTS
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_fdi_validation() {
        for n in [11, 18, 21, 28, 31, 38, 41, 48] {
            assert!(ToothNumber::new(n).is_ok(), "{n} should be valid");
        }
        for n in [0, 10, 19, 20, 29, 30, 49, 50, 51, 55, 85, 99] {
            assert_eq!(
                ToothNumber::new(n),
                Err(TypesError::InvalidToothNumber { number: n })
            );
        }
    }

    #[test]
    fn test_jaw_derivation() {
        assert_eq!(ToothNumber::new(11).unwrap().jaw(), Jaw::Upper);
        assert_eq!(ToothNumber::new(28).unwrap().jaw(), Jaw::Upper);
        assert_eq!(ToothNumber::new(31).unwrap().jaw(), Jaw::Lower);
        assert_eq!(ToothNumber::new(48).unwrap().jaw(), Jaw::Lower);
        assert_eq!(Tooth::new(26).unwrap().jaw(), Jaw::Upper);
    }

    #[test]
    fn test_adjacency() {
        let n = |v| ToothNumber::new(v).unwrap();
        assert!(n(11).is_adjacent(n(12)));
        assert!(n(11).is_adjacent(n(21)));
        assert!(n(41).is_adjacent(n(31)));
        assert!(!n(11).is_adjacent(n(13)));
        assert!(!n(18).is_adjacent(n(21)));
        assert!(!n(11).is_adjacent(n(41)));
    }

    #[test]
    fn test_reconstruction_type_strings() {
        for kind in [
            ReconstructionType::Crown,
            ReconstructionType::Pontic,
            ReconstructionType::Implant,
            ReconstructionType::Veneer,
            ReconstructionType::Antagonist,
        ] {
            assert_eq!(ReconstructionType::from_source_str(kind.source_str()), kind);
        }
        assert_eq!(
            ReconstructionType::from_source_str("Unknown"),
            ReconstructionType::Other
        );
    }

    #[test]
    fn test_training_sample() {
        let ring = |n: usize| {
            (0..n)
                .map(|i| Point3::new(i as f64, 0.0, 0.0))
                .collect::<Vec<_>>()
        };

        let crown = Tooth::new(11).unwrap().with_margin(ring(51));
        assert!(crown.is_valid_training_sample());

        let short = Tooth::new(11).unwrap().with_margin(ring(50));
        assert!(!short.is_valid_training_sample());

        let pontic = Tooth::new(11)
            .unwrap()
            .with_reconstruction_type(ReconstructionType::Pontic)
            .with_margin(ring(80));
        assert!(!pontic.is_valid_training_sample());
    }
}
