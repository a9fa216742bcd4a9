//! Calibration record of a foreign image.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit reported when no spatial unit has been set.
pub const DEFAULT_UNIT: &str = "pixel";
/// Unit reported when no time unit has been set.
pub const DEFAULT_TIME_UNIT: &str = "sec";

/// Pixel sizes, frame interval and their unit strings.
///
/// A `frame_interval` of 0.0 means "unset".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackCalibration {
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub pixel_depth: f64,
    pub frame_interval: f64,
    unit: Option<String>,
    time_unit: Option<String>,
}

impl Default for StackCalibration {
    fn default() -> Self {
        Self {
            pixel_width: 1.0,
            pixel_height: 1.0,
            pixel_depth: 1.0,
            frame_interval: 0.0,
            unit: None,
            time_unit: None,
        }
    }
}

impl StackCalibration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when any pixel size differs from 1.0.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn scaled(&self) -> bool {
        self.pixel_width != 1.0 || self.pixel_height != 1.0 || self.pixel_depth != 1.0
    }

    /// Spatial unit, `"pixel"` when unset.
    #[must_use]
    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or(DEFAULT_UNIT)
    }

    /// Time unit, `"sec"` when unset.
    #[must_use]
    pub fn time_unit(&self) -> &str {
        self.time_unit.as_deref().unwrap_or(DEFAULT_TIME_UNIT)
    }

    /// Spatial unit only if one was explicitly written.
    #[must_use]
    pub fn explicit_unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Time unit only if one was explicitly written.
    #[must_use]
    pub fn explicit_time_unit(&self) -> Option<&str> {
        self.time_unit.as_deref()
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = Some(unit.into());
    }

    pub fn set_time_unit(&mut self, unit: impl Into<String>) {
        self.time_unit = Some(unit.into());
    }
}
