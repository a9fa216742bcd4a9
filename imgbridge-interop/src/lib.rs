//! imgbridge-interop: conversion between the native 5D image model and the
//! foreign stacked-2D model.
//!
//! The crate is organised by concern:
//! - [`transcode`]: plane copies, the signed-16 bias and colour splitting
//! - [`calibration`]: pixel size and frame interval mapping
//! - [`roi`]: ROI translation in both directions
//! - [`assemble`]: whole-image conversion driving the others
//!
//! Conversions are synchronous. Progress and diagnostic listeners are called
//! on the converting thread.
//!

pub mod assemble;
pub mod calibration;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod roi;
pub mod transcode;

pub use assemble::{convert_foreign_to_native, convert_native_to_foreign, Converter};
pub use calibration::{calibrate_foreign, calibrate_native};
pub use diagnostics::DiagnosticListener;
pub use error::{Error, Result};
pub use options::ConversionOptions;
pub use roi::{
    foreign_position, foreign_roi_to_native, foreign_roi_to_native_lenient, native_position,
    native_roi_to_foreign, native_roi_to_foreign_lenient,
};
pub use transcode::{
    export_plane, expand_indexed, import_plane, split_color, split_rgb, transcode, Bias,
    SIGNED16_OFFSET,
};
