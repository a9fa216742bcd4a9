//! Conversion options.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Knobs shared by both conversion directions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionOptions {
    /// Re-bias u16 native planes to signed-16 storage on export.
    pub signed16_output: bool,
    /// Unit written with non-default pixel sizes.
    pub spatial_unit: String,
    /// Unit written with a non-default frame interval.
    pub time_unit: String,
    /// Carry overlay ROIs in addition to the active ROI.
    pub include_overlay: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            signed16_output: false,
            spatial_unit: "mm".to_string(),
            time_unit: "msec".to_string(),
            include_overlay: false,
        }
    }
}

impl ConversionOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables signed-16 export.
    #[must_use]
    pub fn with_signed16_output(mut self, enabled: bool) -> Self {
        self.signed16_output = enabled;
        self
    }

    /// Sets the unit written with pixel sizes.
    #[must_use]
    pub fn with_spatial_unit(mut self, unit: impl Into<String>) -> Self {
        self.spatial_unit = unit.into();
        self
    }

    /// Sets the unit written with the frame interval.
    #[must_use]
    pub fn with_time_unit(mut self, unit: impl Into<String>) -> Self {
        self.time_unit = unit.into();
        self
    }

    /// Enables or disables overlay transport.
    #[must_use]
    pub fn with_overlay(mut self, enabled: bool) -> Self {
        self.include_overlay = enabled;
        self
    }
}
