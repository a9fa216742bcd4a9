//! Conversion error taxonomy.

use thiserror::Error;

/// Result type for conversions.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a conversion can report.
///
/// Only [`Error::MalformedRoi`] is recovered from inside a conversion; every
/// other variant aborts it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A plane's sample type cannot be represented on the other side.
    #[error("unsupported pixel type: {0}")]
    UnsupportedPixelType(String),

    /// A plane's extent disagrees with the declared dimensions.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The foreign plane cursor could not be moved or read.
    #[error("cursor unavailable at (c={c}, z={z}, t={t}): {reason}")]
    CursorUnavailable {
        c: usize,
        z: usize,
        t: usize,
        reason: String,
    },

    /// ROI geometry cannot be translated as-is.
    #[error("malformed ROI: {0}")]
    MalformedRoi(String),

    /// An invariant of one of the models was broken.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors a conversion substitutes and continues past.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedRoi(_))
    }
}

impl From<imgbridge_core::Error> for Error {
    fn from(err: imgbridge_core::Error) -> Self {
        use imgbridge_core::Error as Core;
        match err {
            Core::ShapeMismatch { .. } | Core::PlaneLength { .. } | Core::ChannelCount { .. } => {
                Self::ShapeMismatch(err.to_string())
            }
            Core::DataTypeMismatch { .. } => Self::UnsupportedPixelType(err.to_string()),
            Core::InvalidRoi(msg) => Self::MalformedRoi(msg),
            Core::InvalidDimensions { .. } | Core::MissingPlane { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<imgbridge_stack::Error> for Error {
    fn from(err: imgbridge_stack::Error) -> Self {
        use imgbridge_stack::Error as Stack;
        match err {
            Stack::PositionOutOfRange { c, z, t, .. } | Stack::Unreadable { c, z, t, .. } => {
                Self::CursorUnavailable {
                    c,
                    z,
                    t,
                    reason: err.to_string(),
                }
            }
            Stack::SliceSize { .. } | Stack::InvalidDimensions { .. } => {
                Self::ShapeMismatch(err.to_string())
            }
            Stack::SliceType { .. } | Stack::IncompatibleType { .. } => {
                Self::UnsupportedPixelType(err.to_string())
            }
            Stack::Core(core) => core.into(),
        }
    }
}
