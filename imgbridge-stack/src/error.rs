//! Foreign model error types.

use crate::image::ImageType;
use imgbridge_core::DataType;
use thiserror::Error;

/// Result type for foreign image operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Foreign image error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Cursor moved outside the hyperstack.
    #[error(
        "position (c={c}, z={z}, t={t}) outside {channels} channel(s), {slices} slice(s), {frames} frame(s)"
    )]
    PositionOutOfRange {
        c: usize,
        z: usize,
        t: usize,
        channels: usize,
        slices: usize,
        frames: usize,
    },

    /// The plane under the cursor could not be produced.
    #[error("plane (c={c}, z={z}, t={t}) unreadable: {reason}")]
    Unreadable {
        c: usize,
        z: usize,
        t: usize,
        reason: String,
    },

    /// Slice buffer length disagrees with the stack size.
    #[error("slice has {found} samples, stack is {width}x{height}")]
    SliceSize {
        width: usize,
        height: usize,
        found: usize,
    },

    /// Slice sample type disagrees with earlier slices.
    #[error("slice type {found} differs from stack type {expected}")]
    SliceType { expected: DataType, found: DataType },

    /// Type tag cannot describe the stack's samples.
    #[error("{image_type} cannot hold {data_type} samples")]
    IncompatibleType {
        image_type: ImageType,
        data_type: DataType,
    },

    /// Channel, slice and frame counts do not multiply to the stack size.
    #[error("dimensions {channels}x{slices}x{frames} do not match stack size {stack_size}")]
    InvalidDimensions {
        channels: usize,
        slices: usize,
        frames: usize,
        stack_size: usize,
    },

    /// Native model error.
    #[error("core error: {0}")]
    Core(#[from] imgbridge_core::Error),
}
