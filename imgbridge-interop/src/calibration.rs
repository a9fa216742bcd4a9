//! Calibration mapping between the two models.
//!
//! Unit strings travel as labels only; values are never rescaled.

use crate::options::ConversionOptions;
use imgbridge_core::Calibration;
use imgbridge_stack::StackCalibration;

/// Native calibration for a foreign record.
///
/// Pixel sizes are copied only when the record is scaled, and each axis only
/// when its size is finite and positive; other axes keep the native 1.0. The
/// frame interval follows the same rule.
#[must_use]
pub fn calibrate_native(foreign: &StackCalibration) -> Calibration {
    let mut cal = Calibration::default();
    if foreign.scaled() {
        cal.pixel_size_x = positive_or(foreign.pixel_width, cal.pixel_size_x);
        cal.pixel_size_y = positive_or(foreign.pixel_height, cal.pixel_size_y);
        cal.pixel_size_z = positive_or(foreign.pixel_depth, cal.pixel_size_z);
        if !cal.is_default_spatial() {
            cal.spatial_unit = foreign.explicit_unit().map(str::to_owned);
        }
    }
    if is_positive(foreign.frame_interval) {
        cal.time_interval = foreign.frame_interval;
        cal.time_unit = foreign.explicit_time_unit().map(str::to_owned);
    }
    cal
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if is_positive(value) {
        value
    } else {
        log::debug!("ignoring pixel size {value}");
        fallback
    }
}

/// Foreign record for a native calibration.
///
/// Default values are elided so uncalibrated images carry no unit strings.
#[must_use]
pub fn calibrate_foreign(native: &Calibration, options: &ConversionOptions) -> StackCalibration {
    let mut cal = StackCalibration::default();
    if !native.is_default_spatial() {
        cal.pixel_width = native.pixel_size_x;
        cal.pixel_height = native.pixel_size_y;
        cal.pixel_depth = native.pixel_size_z;
        cal.set_unit(options.spatial_unit.as_str());
    }
    if !native.is_default_time() {
        cal.frame_interval = native.time_interval;
        cal.set_time_unit(options.time_unit.as_str());
    }
    cal
}
