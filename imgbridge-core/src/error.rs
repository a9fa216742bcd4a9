//! Error types for imgbridge-core.

use crate::pixel::DataType;
use thiserror::Error;

/// Result type alias for native model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the native image model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// One or more image sizes is zero.
    #[error(
        "invalid dimensions: {size_x}x{size_y}, z={size_z}, t={size_t}, c={size_c} (all sizes must be >= 1)"
    )]
    InvalidDimensions {
        size_x: usize,
        size_y: usize,
        size_z: usize,
        size_t: usize,
        size_c: usize,
    },

    /// Plane width/height disagrees with the image.
    #[error("shape mismatch: expected {expected_width}x{expected_height}, found {width}x{height}")]
    ShapeMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    /// Buffer length disagrees with `width * height`.
    #[error("plane length mismatch: expected {expected} samples, found {found}")]
    PlaneLength { expected: usize, found: usize },

    /// Plane channel count disagrees with the image.
    #[error("channel count mismatch: expected {expected}, found {found}")]
    ChannelCount { expected: usize, found: usize },

    /// Sample type disagrees with the image or with sibling channels.
    #[error("data type mismatch: expected {expected}, found {found}")]
    DataTypeMismatch { expected: DataType, found: DataType },

    /// No plane installed at `(t, z)`.
    #[error("no plane at t={t}, z={z}")]
    MissingPlane { t: usize, z: usize },

    /// ROI geometry violates its own invariants.
    #[error("invalid ROI: {0}")]
    InvalidRoi(String),
}
