//! Spatial and temporal calibration of a native image.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical pixel sizes and frame interval.
///
/// Unit strings are carried as given and never used to rescale values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Calibration {
    /// Pixel size along X (default 1.0).
    pub pixel_size_x: f64,
    /// Pixel size along Y (default 1.0).
    pub pixel_size_y: f64,
    /// Slice spacing along Z (default 1.0).
    pub pixel_size_z: f64,
    /// Time between frames (default 1.0).
    pub time_interval: f64,
    /// Unit of the pixel sizes, if known.
    pub spatial_unit: Option<String>,
    /// Unit of the time interval, if known.
    pub time_unit: Option<String>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_size_x: 1.0,
            pixel_size_y: 1.0,
            pixel_size_z: 1.0,
            time_interval: 1.0,
            spatial_unit: None,
            time_unit: None,
        }
    }
}

impl Calibration {
    /// Creates an uncalibrated record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets all three pixel sizes.
    #[must_use]
    pub fn with_pixel_size(mut self, x: f64, y: f64, z: f64) -> Self {
        self.pixel_size_x = x;
        self.pixel_size_y = y;
        self.pixel_size_z = z;
        self
    }

    /// Sets the frame interval.
    #[must_use]
    pub fn with_time_interval(mut self, interval: f64) -> Self {
        self.time_interval = interval;
        self
    }

    /// True when every pixel size is exactly 1.0.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_default_spatial(&self) -> bool {
        self.pixel_size_x == 1.0 && self.pixel_size_y == 1.0 && self.pixel_size_z == 1.0
    }

    /// True when the frame interval is exactly 1.0.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_default_time(&self) -> bool {
        self.time_interval == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uncalibrated() {
        let cal = Calibration::default();
        assert!(cal.is_default_spatial());
        assert!(cal.is_default_time());
        assert!(cal.spatial_unit.is_none());
    }

    #[test]
    fn test_builders() {
        let cal = Calibration::new()
            .with_pixel_size(0.5, 0.5, 2.0)
            .with_time_interval(1.0);
        assert!(!cal.is_default_spatial());
        assert!(cal.is_default_time());
    }
}
