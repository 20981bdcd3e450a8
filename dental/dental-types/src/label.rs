//! Per-vertex region labels.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Region label for one mesh vertex.
///
/// Integer codes follow the source data (`Unlabeled = 0`, `Tooth = 1`,
/// `Gum = 2`). Conflicts between teeth are resolved by [`VertexLabel::merge`],
/// which ranks `Tooth > Gum > Unlabeled` independently of the codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum VertexLabel {
    /// Not claimed by any tooth.
    #[default]
    Unlabeled = 0,
    /// Inside a tooth footprint, above the margin.
    Tooth = 1,
    /// Inside a tooth footprint, at or below the margin.
    Gum = 2,
}

impl VertexLabel {
    /// Integer code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Label for an integer code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unlabeled),
            1 => Some(Self::Tooth),
            2 => Some(Self::Gum),
            _ => None,
        }
    }

    /// Merge rank: higher wins.
    #[inline]
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Unlabeled => 0,
            Self::Gum => 1,
            Self::Tooth => 2,
        }
    }

    /// Combine two claims on the same vertex.
    ///
    /// Commutative and associative, so the result does not depend on the
    /// order in which teeth are merged.
    ///
    /// ```
    /// use dental_types::VertexLabel::{Gum, Tooth, Unlabeled};
    ///
    /// assert_eq!(Gum.merge(Tooth), Tooth);
    /// assert_eq!(Tooth.merge(Gum), Tooth);
    /// assert_eq!(Unlabeled.merge(Gum), Gum);
    /// ```
    #[inline]
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        if other.priority() > self.priority() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for VertexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlabeled => f.write_str("unlabeled"),
            Self::Tooth => f.write_str("tooth"),
            Self::Gum => f.write_str("gum"),
        }
    }
}
