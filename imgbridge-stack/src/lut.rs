//! Lookup tables for indexed-colour planes.
#![allow(clippy::cast_possible_truncation)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of entries an 8-bit index can address.
pub const LUT_SIZE: usize = 256;

/// A colour model mapping 8-bit indices to RGB triples.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lut {
    entries: Vec<[u8; 3]>,
}

impl Lut {
    /// Builds a table from explicit entries, keeping at most [`LUT_SIZE`].
    #[must_use]
    pub fn new(mut entries: Vec<[u8; 3]>) -> Self {
        entries.truncate(LUT_SIZE);
        Self { entries }
    }

    /// The identity grey ramp.
    #[must_use]
    pub fn grayscale() -> Self {
        Self {
            entries: (0..LUT_SIZE).map(|i| [i as u8; 3]).collect(),
        }
    }

    /// RGB triple for `index`; indices past the table map to black.
    #[inline]
    #[must_use]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.entries
            .get(usize::from(index))
            .copied()
            .unwrap_or([0, 0, 0])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True for the identity grey ramp.
    #[must_use]
    pub fn is_grayscale(&self) -> bool {
        self.entries.len() == LUT_SIZE
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(i, rgb)| *rgb == [i as u8; 3])
    }
}

impl Default for Lut {
    fn default() -> Self {
        Self::grayscale()
    }
}
