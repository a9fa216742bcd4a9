//! Flat slice stack.

use crate::error::{Error, Result};
use crate::lut::Lut;
use imgbridge_core::{DataType, PlaneData};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ordered list of equally sized 2D slices sharing one sample type.
///
/// Slices are addressed 1-based, like the toolkit this models.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageStack {
    width: usize,
    height: usize,
    slices: Vec<PlaneData>,
    lut: Lut,
}

impl ImageStack {
    /// Creates an empty stack with a grayscale colour model.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            slices: Vec::new(),
            lut: Lut::grayscale(),
        }
    }

    /// Creates an empty stack with a preallocated slice list.
    #[must_use]
    pub fn with_capacity(width: usize, height: usize, capacity: usize) -> Self {
        Self {
            slices: Vec::with_capacity(capacity),
            ..Self::new(width, height)
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of slices.
    #[must_use]
    pub fn size(&self) -> usize {
        self.slices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Sample type shared by every slice, `None` while empty.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        self.slices.first().map(PlaneData::data_type)
    }

    /// Appends a slice.
    ///
    /// # Errors
    /// Fails when the slice length is not `width * height` or its type
    /// differs from the slices already present.
    pub fn add_slice(&mut self, slice: PlaneData) -> Result<()> {
        if slice.len() != self.width * self.height {
            return Err(Error::SliceSize {
                width: self.width,
                height: self.height,
                found: slice.len(),
            });
        }
        if let Some(expected) = self.data_type() {
            if slice.data_type() != expected {
                return Err(Error::SliceType {
                    expected,
                    found: slice.data_type(),
                });
            }
        }
        self.slices.push(slice);
        Ok(())
    }

    /// Slice `n`, counting from 1.
    #[must_use]
    pub fn slice(&self, n: usize) -> Option<&PlaneData> {
        n.checked_sub(1).and_then(|i| self.slices.get(i))
    }

    /// Slices in stack order.
    #[must_use]
    pub fn slices(&self) -> &[PlaneData] {
        &self.slices
    }

    #[must_use]
    pub fn lut(&self) -> &Lut {
        &self.lut
    }

    pub fn set_lut(&mut self, lut: Lut) {
        self.lut = lut;
    }
}
