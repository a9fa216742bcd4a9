//! Pixel data types and typed plane buffers.
#![allow(clippy::cast_precision_loss, clippy::cast_lossless)]

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sample type of a native plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    /// 8-bit unsigned.
    U8,
    /// 16-bit unsigned.
    U16,
    /// 16-bit signed.
    I16,
    /// 32-bit unsigned.
    U32,
    /// 32-bit signed.
    I32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
    /// Packed `0x00RRGGBB` colour in a `u32`.
    Rgb24,
}

impl DataType {
    /// Size of one sample in bytes.
    #[must_use]
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 | Self::Rgb24 => 4,
            Self::F64 => 8,
        }
    }

    /// Whether samples carry a sign.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I16 | Self::I32 | Self::F32 | Self::F64)
    }

    /// Whether this is one of the two 16-bit integer types.
    #[must_use]
    pub const fn is_16bit(self) -> bool {
        matches!(self, Self::U16 | Self::I16)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Rgb24 => "rgb24",
        };
        f.write_str(name)
    }
}

/// An owned, typed 1D sample buffer holding one 2D plane in row-major order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaneData {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Rgb24(Vec<u32>),
}

impl PlaneData {
    /// Allocates a zero-filled buffer of `len` samples.
    #[must_use]
    pub fn zeros(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::U8 => Self::U8(vec![0; len]),
            DataType::U16 => Self::U16(vec![0; len]),
            DataType::I16 => Self::I16(vec![0; len]),
            DataType::U32 => Self::U32(vec![0; len]),
            DataType::I32 => Self::I32(vec![0; len]),
            DataType::F32 => Self::F32(vec![0.0; len]),
            DataType::F64 => Self::F64(vec![0.0; len]),
            DataType::Rgb24 => Self::Rgb24(vec![0; len]),
        }
    }

    /// Sample type of this buffer.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Self::U8(_) => DataType::U8,
            Self::U16(_) => DataType::U16,
            Self::I16(_) => DataType::I16,
            Self::U32(_) => DataType::U32,
            Self::I32(_) => DataType::I32,
            Self::F32(_) => DataType::F32,
            Self::F64(_) => DataType::F64,
            Self::Rgb24(_) => DataType::Rgb24,
        }
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U32(v) | Self::Rgb24(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    /// Returns true if the buffer holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample `index` widened to `f64`, or `None` when out of range.
    ///
    /// Packed RGB samples are returned as their raw `u32` value.
    #[must_use]
    pub fn sample_f64(&self, index: usize) -> Option<f64> {
        match self {
            Self::U8(v) => v.get(index).map(|&s| s as f64),
            Self::U16(v) => v.get(index).map(|&s| s as f64),
            Self::I16(v) => v.get(index).map(|&s| s as f64),
            Self::U32(v) | Self::Rgb24(v) => v.get(index).map(|&s| s as f64),
            Self::I32(v) => v.get(index).map(|&s| s as f64),
            Self::F32(v) => v.get(index).map(|&s| s as f64),
            Self::F64(v) => v.get(index).copied(),
        }
    }

    #[must_use]
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Self::U8(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u16(&self) -> Option<&[u16]> {
        match self {
            Self::U16(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i16(&self) -> Option<&[i16]> {
        match self {
            Self::I16(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_u32(&self) -> Option<&[u32]> {
        match self {
            Self::U32(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            Self::I32(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::F32(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Self::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Packed RGB samples.
    #[must_use]
    pub fn as_rgb24(&self) -> Option<&[u32]> {
        match self {
            Self::Rgb24(v) => Some(v),
            _ => None,
        }
    }
}
