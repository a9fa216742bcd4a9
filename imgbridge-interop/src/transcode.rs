//! Pixel plane transcoding.
//!
//! Planes are always copied; nothing returned here aliases the source buffer.
//! The signed-16 bias is modular 16-bit arithmetic, so subtracting 32768 from
//! the two's-complement bits of `v` yields `v + 32768` as an unsigned value.
#![allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use crate::error::{Error, Result};
use imgbridge_core::{DataType, PlaneData};
use imgbridge_stack::{ImageType, Lut};

/// Offset between signed-16 values and their unsigned storage.
pub const SIGNED16_OFFSET: u16 = 0x8000;

/// Bias applied while transcoding 16-bit planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    #[default]
    None,
    /// Signed-16 storage to unsigned native values.
    SubtractSigned16,
    /// Unsigned native values to signed-16 storage.
    AddSigned16,
}

/// Copies `src` into a buffer of type `target`, applying `bias`.
///
/// Supported: any type to itself without bias, `I16`/`U16` to `U16` with
/// [`Bias::SubtractSigned16`], and `U16` to `I16` with [`Bias::AddSigned16`].
///
/// # Errors
/// Returns [`Error::ShapeMismatch`] if `src` does not hold `width * height`
/// samples and [`Error::UnsupportedPixelType`] for any other combination.
pub fn transcode(
    src: &PlaneData,
    width: usize,
    height: usize,
    target: DataType,
    bias: Bias,
) -> Result<PlaneData> {
    check_len(src, width, height)?;
    match (src, target, bias) {
        (_, target, Bias::None) if src.data_type() == target => Ok(src.clone()),
        (PlaneData::I16(v), DataType::U16, Bias::SubtractSigned16) => Ok(PlaneData::U16(
            v.iter()
                .map(|&s| (s as u16).wrapping_sub(SIGNED16_OFFSET))
                .collect(),
        )),
        (PlaneData::U16(v), DataType::U16, Bias::SubtractSigned16) => Ok(PlaneData::U16(
            v.iter().map(|&s| s.wrapping_sub(SIGNED16_OFFSET)).collect(),
        )),
        (PlaneData::U16(v), DataType::I16, Bias::AddSigned16) => Ok(PlaneData::I16(
            v.iter()
                .map(|&s| s.wrapping_add(SIGNED16_OFFSET) as i16)
                .collect(),
        )),
        _ => Err(Error::UnsupportedPixelType(format!(
            "cannot transcode {} to {target} with {bias:?} bias",
            src.data_type()
        ))),
    }
}

/// Foreign plane to native storage.
///
/// With `signed16` set, 16-bit planes are unbiased to `U16`; everything else
/// is copied unchanged.
///
/// # Errors
/// See [`transcode`].
pub fn import_plane(src: &PlaneData, width: usize, height: usize, signed16: bool) -> Result<PlaneData> {
    if signed16 && src.data_type().is_16bit() {
        transcode(src, width, height, DataType::U16, Bias::SubtractSigned16)
    } else {
        transcode(src, width, height, src.data_type(), Bias::None)
    }
}

/// Native plane to foreign storage.
///
/// With `signed16_output` set, `U16` planes are biased into `I16`; the
/// caller flags the foreign image as signed-16 in that case.
///
/// # Errors
/// See [`transcode`].
pub fn export_plane(
    src: &PlaneData,
    width: usize,
    height: usize,
    signed16_output: bool,
) -> Result<PlaneData> {
    if signed16_output && src.data_type() == DataType::U16 {
        transcode(src, width, height, DataType::I16, Bias::AddSigned16)
    } else {
        transcode(src, width, height, src.data_type(), Bias::None)
    }
}

/// Splits packed `0x00RRGGBB` samples into red, green and blue `U8` planes.
#[must_use]
pub fn split_rgb(packed: &[u32]) -> Vec<PlaneData> {
    let mut r = Vec::with_capacity(packed.len());
    let mut g = Vec::with_capacity(packed.len());
    let mut b = Vec::with_capacity(packed.len());
    for &px in packed {
        let [_, red, green, blue] = px.to_be_bytes();
        r.push(red);
        g.push(green);
        b.push(blue);
    }
    vec![PlaneData::U8(r), PlaneData::U8(g), PlaneData::U8(b)]
}

/// Expands 8-bit indices through `lut` into red, green and blue `U8` planes.
#[must_use]
pub fn expand_indexed(indices: &[u8], lut: &Lut) -> Vec<PlaneData> {
    let mut r = Vec::with_capacity(indices.len());
    let mut g = Vec::with_capacity(indices.len());
    let mut b = Vec::with_capacity(indices.len());
    for &index in indices {
        let [red, green, blue] = lut.rgb(index);
        r.push(red);
        g.push(green);
        b.push(blue);
    }
    vec![PlaneData::U8(r), PlaneData::U8(g), PlaneData::U8(b)]
}

/// Demultiplexes a packed or indexed colour plane into three channels.
///
/// Indexed planes without a table use the grey ramp.
///
/// # Errors
/// Returns [`Error::UnsupportedPixelType`] when `image_type` is not a colour
/// type or disagrees with the buffer, and [`Error::ShapeMismatch`] on a bad
/// length.
pub fn split_color(
    src: &PlaneData,
    width: usize,
    height: usize,
    image_type: ImageType,
    lut: Option<&Lut>,
) -> Result<Vec<PlaneData>> {
    check_len(src, width, height)?;
    match (image_type, src) {
        (ImageType::ColorRgb, PlaneData::Rgb24(packed)) => Ok(split_rgb(packed)),
        (ImageType::Color256, PlaneData::U8(indices)) => Ok(match lut {
            Some(lut) => expand_indexed(indices, lut),
            None => expand_indexed(indices, &Lut::grayscale()),
        }),
        _ => Err(Error::UnsupportedPixelType(format!(
            "{image_type} plane stored as {}",
            src.data_type()
        ))),
    }
}

fn check_len(src: &PlaneData, width: usize, height: usize) -> Result<()> {
    if src.len() == width * height {
        Ok(())
    } else {
        Err(Error::ShapeMismatch(format!(
            "plane holds {} samples, expected {width}x{height}",
            src.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed16_import_law() {
        let src = PlaneData::I16(vec![-32768, 0, 1, 32767]);
        let out = import_plane(&src, 2, 2, true).unwrap();
        assert_eq!(out, PlaneData::U16(vec![0, 32768, 32769, 65535]));
    }

    #[test]
    fn test_signed16_law_holds_for_every_value() {
        let all: Vec<i16> = (i16::MIN..=i16::MAX).collect();
        let out = import_plane(&PlaneData::I16(all.clone()), all.len(), 1, true).unwrap();
        let out = out.as_u16().unwrap();
        for (v, u) in all.iter().zip(out) {
            assert_eq!(i32::from(*u), i32::from(*v) + 32768);
        }
    }

    #[test]
    fn test_export_bias_inverts_import() {
        let native = PlaneData::U16(vec![0, 32768, 32769, 65535]);
        let foreign = export_plane(&native, 4, 1, true).unwrap();
        assert_eq!(foreign, PlaneData::I16(vec![-32768, 0, 1, 32767]));
        assert_eq!(import_plane(&foreign, 4, 1, true).unwrap(), native);
    }

    #[test]
    fn test_default_export_copies() {
        let native = PlaneData::U16(vec![7, 8]);
        assert_eq!(export_plane(&native, 2, 1, false).unwrap(), native);
        let floats = PlaneData::F64(vec![0.5, -1.25]);
        assert_eq!(export_plane(&floats, 1, 2, true).unwrap(), floats);
    }

    #[test]
    fn test_unsigned_import_ignores_non_16bit() {
        let src = PlaneData::U8(vec![1, 2, 3]);
        assert_eq!(import_plane(&src, 3, 1, true).unwrap(), src);
    }

    #[test]
    fn test_unsupported_and_shape_errors() {
        let src = PlaneData::F32(vec![0.0; 4]);
        assert!(matches!(
            transcode(&src, 2, 2, DataType::U8, Bias::None),
            Err(Error::UnsupportedPixelType(_))
        ));
        assert!(matches!(
            transcode(&src, 3, 2, DataType::F32, Bias::None),
            Err(Error::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_split_rgb() {
        let planes = split_rgb(&[0x00FF_8001, 0x0000_00FF]);
        assert_eq!(planes[0], PlaneData::U8(vec![0xFF, 0x00]));
        assert_eq!(planes[1], PlaneData::U8(vec![0x80, 0x00]));
        assert_eq!(planes[2], PlaneData::U8(vec![0x01, 0xFF]));
    }

    #[test]
    fn test_split_color_indexed() {
        let lut = Lut::new(vec![[10, 20, 30], [40, 50, 60]]);
        let src = PlaneData::U8(vec![1, 0]);
        let planes = split_color(&src, 2, 1, ImageType::Color256, Some(&lut)).unwrap();
        assert_eq!(planes[0], PlaneData::U8(vec![40, 10]));
        assert_eq!(planes[2], PlaneData::U8(vec![60, 30]));

        let grey = split_color(&src, 2, 1, ImageType::Color256, None).unwrap();
        assert_eq!(grey[1], PlaneData::U8(vec![1, 0]));
    }

    #[test]
    fn test_split_color_rejects_gray() {
        let src = PlaneData::U8(vec![0; 4]);
        assert!(split_color(&src, 2, 2, ImageType::Gray8, None).is_err());
        assert!(split_color(&src, 2, 2, ImageType::ColorRgb, None).is_err());
    }
}
