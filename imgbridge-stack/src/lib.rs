//! imgbridge-stack: the foreign stacked-2D image model.
//!
//! Images are flat slice stacks viewed as channels, slices and frames through
//! a 1-based cursor, with a type tag, a signed-16 flag, calibration, lookup
//! tables and a ROI taxonomy identified by numeric type codes.
//!

pub mod calibration;
pub mod error;
pub mod image;
pub mod lut;
pub mod roi;
pub mod stack;

pub use calibration::StackCalibration;
pub use error::{Error, Result};
pub use image::{CompositeMode, ForeignImage, ImageType, StackImage};
pub use lut::Lut;
pub use roi::{ForeignRoi, PolygonKind, RoiGeometry, RoiMask, RoiType, StackPosition};
pub use stack::ImageStack;
