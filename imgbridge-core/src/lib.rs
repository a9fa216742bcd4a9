//! imgbridge-core: the native 5D image model.
//!
//! This crate provides typed plane buffers, the [`Image5D`] container with
//! scoped update windows, calibration, the 2D ROI taxonomy, and progress
//! reporting shared by the conversion layer.
//!

pub mod calibration;
pub mod error;
pub mod geometry;
pub mod image;
pub mod pixel;
pub mod progress;
pub mod roi;

pub use calibration::Calibration;
pub use error::{Error, Result};
pub use geometry::{path_bounds, Color, PathSegment, Point2, Rect};
pub use image::{Dimensions, Image5D, ImageEvent, ImageListener, ImagePlane, UpdateGuard};
pub use pixel::{DataType, PlaneData};
pub use progress::ProgressListener;
pub use roi::{AreaMask, PathShape, Roi2D, RoiPosition, RoiShape};
