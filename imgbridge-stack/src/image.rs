//! Foreign image access and an owned in-memory implementation.

use crate::calibration::StackCalibration;
use crate::error::{Error, Result};
use crate::lut::Lut;
use crate::roi::ForeignRoi;
use crate::stack::ImageStack;
use imgbridge_core::{DataType, Dimensions, PlaneData};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The toolkit's image type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ImageType {
    Gray8,
    Gray16,
    Gray32,
    /// 8-bit indices into a lookup table.
    Color256,
    /// Packed 24-bit RGB.
    ColorRgb,
}

impl ImageType {
    /// Tag the toolkit would show for slices of `data_type`.
    #[must_use]
    pub const fn for_data_type(data_type: DataType) -> Self {
        match data_type {
            DataType::U8 => Self::Gray8,
            DataType::U16 | DataType::I16 => Self::Gray16,
            DataType::U32 | DataType::I32 | DataType::F32 | DataType::F64 => Self::Gray32,
            DataType::Rgb24 => Self::ColorRgb,
        }
    }

    /// Whether slices of `data_type` can carry this tag.
    #[must_use]
    pub const fn accepts(self, data_type: DataType) -> bool {
        match self {
            Self::Gray8 | Self::Color256 => matches!(data_type, DataType::U8),
            Self::Gray16 => matches!(data_type, DataType::U16 | DataType::I16),
            Self::Gray32 => matches!(
                data_type,
                DataType::U32 | DataType::I32 | DataType::F32 | DataType::F64
            ),
            Self::ColorRgb => matches!(data_type, DataType::Rgb24),
        }
    }

    /// True for indexed and packed colour.
    #[must_use]
    pub const fn is_color(self) -> bool {
        matches!(self, Self::Color256 | Self::ColorRgb)
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gray8 => "GRAY8",
            Self::Gray16 => "GRAY16",
            Self::Gray32 => "GRAY32",
            Self::Color256 => "COLOR_256",
            Self::ColorRgb => "COLOR_RGB",
        })
    }
}

/// Multi-channel display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompositeMode {
    /// Channels blended together.
    Composite,
    /// One channel at a time, each in its own colour.
    Color,
}

/// Read access to a foreign image through its 1-based plane cursor.
///
/// Implementations backed by I/O may fail in [`ForeignImage::set_position`]
/// or [`ForeignImage::pixels`]; in-memory ones only fail on bad indices.
pub trait ForeignImage {
    fn title(&self) -> &str;

    /// Sizes along X, Y, Z, T and C.
    fn dimensions(&self) -> Dimensions;

    fn image_type(&self) -> ImageType;

    /// True when 16-bit samples are signed values stored with a +32768 offset.
    fn is_signed16(&self) -> bool;

    /// Moves the cursor to channel `c`, slice `z`, frame `t`, all 1-based.
    ///
    /// # Errors
    /// Fails when the position is out of range or cannot be reached.
    fn set_position(&mut self, c: usize, z: usize, t: usize) -> Result<()>;

    /// Plane under the cursor.
    ///
    /// # Errors
    /// Fails when the plane cannot be produced.
    fn pixels(&self) -> Result<&PlaneData>;

    /// Moves the cursor and borrows the plane there.
    ///
    /// # Errors
    /// Propagates cursor and read failures.
    fn read_plane(&mut self, c: usize, z: usize, t: usize) -> Result<&PlaneData> {
        self.set_position(c, z, t)?;
        self.pixels()
    }

    /// The active ROI, if any.
    fn roi(&self) -> Option<&ForeignRoi>;

    /// ROIs drawn in the overlay.
    fn overlay(&self) -> &[ForeignRoi] {
        &[]
    }

    fn calibration(&self) -> &StackCalibration;

    /// Colour model for indexed planes.
    fn lut(&self) -> Option<&Lut> {
        None
    }
}

/// An owned foreign image over an [`ImageStack`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackImage {
    title: String,
    stack: ImageStack,
    channels: usize,
    slices: usize,
    frames: usize,
    cursor: (usize, usize, usize),
    image_type: ImageType,
    signed16: bool,
    open_as_hyperstack: bool,
    roi: Option<ForeignRoi>,
    overlay: Vec<ForeignRoi>,
    calibration: StackCalibration,
    composite_mode: Option<CompositeMode>,
}

impl StackImage {
    /// Wraps a non-empty stack as a single-channel, single-frame image.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimensions`] for an empty stack.
    pub fn new(title: impl Into<String>, stack: ImageStack) -> Result<Self> {
        let Some(data_type) = stack.data_type() else {
            return Err(Error::InvalidDimensions {
                channels: 1,
                slices: 0,
                frames: 1,
                stack_size: 0,
            });
        };
        let slices = stack.size();
        Ok(Self {
            title: title.into(),
            stack,
            channels: 1,
            slices,
            frames: 1,
            cursor: (1, 1, 1),
            image_type: ImageType::for_data_type(data_type),
            signed16: false,
            open_as_hyperstack: false,
            roi: None,
            overlay: Vec::new(),
            calibration: StackCalibration::default(),
            composite_mode: None,
        })
    }

    #[must_use]
    pub fn stack(&self) -> &ImageStack {
        &self.stack
    }

    /// Sets the channel, slice and frame counts.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimensions`] unless the product equals the
    /// stack size.
    pub fn set_dimensions(&mut self, channels: usize, slices: usize, frames: usize) -> Result<()> {
        if channels * slices * frames != self.stack.size() || channels == 0 {
            return Err(Error::InvalidDimensions {
                channels,
                slices,
                frames,
                stack_size: self.stack.size(),
            });
        }
        self.channels = channels;
        self.slices = slices;
        self.frames = frames;
        self.cursor = (1, 1, 1);
        Ok(())
    }

    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn n_slices(&self) -> usize {
        self.slices
    }

    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.frames
    }

    /// 1-based stack index of `(c, z, t)`; all three must be at least 1.
    #[must_use]
    pub fn stack_index(&self, c: usize, z: usize, t: usize) -> usize {
        1 + (c - 1) + self.channels * ((z - 1) + self.slices * (t - 1))
    }

    /// Two plus one for each of C, Z and T that has more than one index.
    #[must_use]
    pub fn n_dimensions(&self) -> usize {
        2 + usize::from(self.channels > 1)
            + usize::from(self.slices > 1)
            + usize::from(self.frames > 1)
    }

    /// Current cursor as `(c, z, t)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize, usize) {
        self.cursor
    }

    /// Overrides the type tag.
    ///
    /// # Errors
    /// Returns [`Error::IncompatibleType`] when the stack's samples cannot
    /// carry it.
    pub fn set_image_type(&mut self, image_type: ImageType) -> Result<()> {
        if let Some(data_type) = self.stack.data_type() {
            if !image_type.accepts(data_type) {
                return Err(Error::IncompatibleType {
                    image_type,
                    data_type,
                });
            }
        }
        self.image_type = image_type;
        Ok(())
    }

    pub fn set_signed16(&mut self, signed16: bool) {
        self.signed16 = signed16;
    }

    #[must_use]
    pub fn open_as_hyperstack(&self) -> bool {
        self.open_as_hyperstack
    }

    pub fn set_open_as_hyperstack(&mut self, open: bool) {
        self.open_as_hyperstack = open;
    }

    pub fn set_roi(&mut self, roi: ForeignRoi) {
        self.roi = Some(roi);
    }

    pub fn kill_roi(&mut self) {
        self.roi = None;
    }

    pub fn add_to_overlay(&mut self, roi: ForeignRoi) {
        self.overlay.push(roi);
    }

    pub fn set_calibration(&mut self, calibration: StackCalibration) {
        self.calibration = calibration;
    }

    #[must_use]
    pub fn composite_mode(&self) -> Option<CompositeMode> {
        self.composite_mode
    }

    /// Wraps the image as a composite shown in `mode`.
    pub fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.composite_mode = Some(mode);
    }

    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.composite_mode.is_some()
    }

    pub fn set_lut(&mut self, lut: Lut) {
        self.stack.set_lut(lut);
    }
}

impl ForeignImage for StackImage {
    fn title(&self) -> &str {
        &self.title
    }

    fn dimensions(&self) -> Dimensions {
        Dimensions::new(
            self.stack.width(),
            self.stack.height(),
            self.slices,
            self.frames,
            self.channels,
        )
    }

    fn image_type(&self) -> ImageType {
        self.image_type
    }

    fn is_signed16(&self) -> bool {
        self.signed16
    }

    fn set_position(&mut self, c: usize, z: usize, t: usize) -> Result<()> {
        if !(1..=self.channels).contains(&c)
            || !(1..=self.slices).contains(&z)
            || !(1..=self.frames).contains(&t)
        {
            return Err(Error::PositionOutOfRange {
                c,
                z,
                t,
                channels: self.channels,
                slices: self.slices,
                frames: self.frames,
            });
        }
        self.cursor = (c, z, t);
        Ok(())
    }

    fn pixels(&self) -> Result<&PlaneData> {
        let (c, z, t) = self.cursor;
        let index = self.stack_index(c, z, t);
        self.stack.slice(index).ok_or_else(|| Error::Unreadable {
            c,
            z,
            t,
            reason: format!("stack index {index} beyond {} slice(s)", self.stack.size()),
        })
    }

    fn roi(&self) -> Option<&ForeignRoi> {
        self.roi.as_ref()
    }

    fn overlay(&self) -> &[ForeignRoi] {
        &self.overlay
    }

    fn calibration(&self) -> &StackCalibration {
        &self.calibration
    }

    fn lut(&self) -> Option<&Lut> {
        Some(self.stack.lut())
    }
}
