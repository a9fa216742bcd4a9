//! Whole-image conversion in both directions.

use crate::calibration::{calibrate_foreign, calibrate_native};
use crate::diagnostics::DiagnosticListener;
use crate::error::{Error, Result};
use crate::options::ConversionOptions;
use crate::roi::{foreign_roi_to_native_lenient, native_roi_to_foreign_lenient};
use crate::transcode::{export_plane, import_plane, split_color};
use imgbridge_core::{DataType, Dimensions, Image5D, ImagePlane, ProgressListener};
use imgbridge_stack::{CompositeMode, ForeignImage, ImageStack, ImageType, Lut, StackImage};

/// Converts images between the native and foreign models.
///
/// Holds the options plus optional progress and diagnostic listeners, which
/// are called synchronously on the converting thread.
#[derive(Default)]
pub struct Converter<'a> {
    options: ConversionOptions,
    progress: Option<&'a mut dyn ProgressListener>,
    diagnostics: Option<&'a mut dyn DiagnosticListener>,
}

impl<'a> Converter<'a> {
    #[must_use]
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            progress: None,
            diagnostics: None,
        }
    }

    /// Reports `(current, total)` before each unit of work.
    #[must_use]
    pub fn with_progress(mut self, listener: &'a mut dyn ProgressListener) -> Self {
        self.progress = Some(listener);
        self
    }

    /// Receives every ROI error the conversion recovered from.
    #[must_use]
    pub fn with_diagnostics(mut self, listener: &'a mut dyn DiagnosticListener) -> Self {
        self.diagnostics = Some(listener);
        self
    }

    #[must_use]
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Builds a new native image from `image`.
    ///
    /// # Errors
    /// See [`Converter::foreign_to_native_into`].
    pub fn foreign_to_native<I>(&mut self, image: &mut I) -> Result<Image5D>
    where
        I: ForeignImage + ?Sized,
    {
        let mut native = Image5D::empty(image.title());
        self.foreign_to_native_into(image, &mut native)?;
        Ok(native)
    }

    /// Replaces the content of `recipient` with `image`.
    ///
    /// All changes are staged in one update window: listeners on `recipient`
    /// receive a single batch on success and nothing on failure, and a failed
    /// conversion leaves `recipient` as it was.
    ///
    /// # Errors
    /// Fails on unreadable planes, planes whose size disagrees with the
    /// declared dimensions, and unsupported sample types. Malformed ROIs are
    /// replaced and reported instead.
    pub fn foreign_to_native_into<I>(&mut self, image: &mut I, recipient: &mut Image5D) -> Result<()>
    where
        I: ForeignImage + ?Sized,
    {
        let dims = image.dimensions();
        dims.validate()?;
        let image_type = image.image_type();
        let signed16 = image.is_signed16();
        let lut = image.lut().cloned();
        let split = dims.size_c == 1 && image_type.is_color();
        log::debug!(
            "foreign '{}' -> native: {}x{} c={} z={} t={} {image_type}{}{}",
            image.title(),
            dims.size_x,
            dims.size_y,
            dims.size_c,
            dims.size_z,
            dims.size_t,
            if signed16 { " signed16" } else { "" },
            if split { " (colour split)" } else { "" },
        );

        let mut update = recipient.begin_replace();
        update.set_name(image.title());

        let total = dims.plane_count();
        for t in 0..dims.size_t {
            for z in 0..dims.size_z {
                self.notify_progress(t * dims.size_z + z, total);
                let plane = if split {
                    read_color_plane(image, dims, z, t, image_type, lut.as_ref())?
                } else {
                    read_channels(image, dims, z, t, signed16)?
                };
                log::trace!("installed plane t={t} z={z}");
                update.set_plane(t, z, plane)?;
            }
        }

        let mut rois = Vec::new();
        if let Some(roi) = image.roi() {
            rois.extend(foreign_roi_to_native_lenient(roi, self.diagnostics()));
        }
        if self.options.include_overlay {
            for roi in image.overlay() {
                rois.extend(foreign_roi_to_native_lenient(roi, self.diagnostics()));
            }
        }
        for roi in rois {
            update.add_roi(roi);
        }
        update.set_calibration(calibrate_native(image.calibration()));
        update.commit();
        Ok(())
    }

    /// Builds a foreign image from `image`.
    ///
    /// Planes are appended in `(t, z, c)` order. Multi-channel results are
    /// wrapped as composites: more than four channels show one colour at a
    /// time, two to four are blended.
    ///
    /// # Errors
    /// Fails when `image` is empty or incomplete, or a plane cannot be copied.
    pub fn native_to_foreign(&mut self, image: &Image5D) -> Result<StackImage> {
        let dims = image.dimensions();
        dims.validate()?;
        let signed16 =
            self.options.signed16_output && image.data_type() == Some(DataType::U16);
        log::debug!(
            "native '{}' -> foreign: {}x{} c={} z={} t={}{}",
            image.name(),
            dims.size_x,
            dims.size_y,
            dims.size_c,
            dims.size_z,
            dims.size_t,
            if signed16 { " signed16" } else { "" },
        );

        let total = dims.slice_count();
        let mut stack = ImageStack::with_capacity(dims.size_x, dims.size_y, total);
        for t in 0..dims.size_t {
            for z in 0..dims.size_z {
                for c in 0..dims.size_c {
                    self.notify_progress(stack.size(), total);
                    let src = image
                        .data_xy(t, z, c)
                        .ok_or(imgbridge_core::Error::MissingPlane { t, z })?;
                    stack.add_slice(export_plane(src, dims.size_x, dims.size_y, signed16)?)?;
                }
                log::trace!("exported plane t={t} z={z}");
            }
        }

        let mut foreign = StackImage::new(image.name(), stack)?;
        foreign.set_dimensions(dims.size_c, dims.size_z, dims.size_t)?;
        if foreign.n_dimensions() > 3 {
            foreign.set_open_as_hyperstack(true);
        }
        foreign.set_signed16(signed16);

        if let Some((first, rest)) = image.rois().split_first() {
            let active = native_roi_to_foreign_lenient(first, self.diagnostics());
            if self.options.include_overlay {
                if let Some(roi) = &active {
                    foreign.add_to_overlay(roi.clone());
                }
                for roi in rest {
                    if let Some(roi) = native_roi_to_foreign_lenient(roi, self.diagnostics()) {
                        foreign.add_to_overlay(roi);
                    }
                }
            }
            if let Some(roi) = active {
                foreign.set_roi(roi);
            }
        }

        foreign.set_calibration(calibrate_foreign(image.calibration(), &self.options));
        if dims.size_c > 4 {
            foreign.set_composite_mode(CompositeMode::Color);
        } else if dims.size_c > 1 {
            foreign.set_composite_mode(CompositeMode::Composite);
        }
        Ok(foreign)
    }

    fn notify_progress(&mut self, current: usize, total: usize) {
        if let Some(listener) = self.progress.as_mut() {
            listener.notify_progress(current, total);
        }
    }

    fn diagnostics(&mut self) -> Option<&mut dyn DiagnosticListener> {
        let listener = self.diagnostics.as_mut()?;
        Some(&mut **listener)
    }
}

/// Reads every channel at `(z, t)` and assembles them into one plane.
fn read_channels<I>(image: &mut I, dims: Dimensions, z: usize, t: usize, signed16: bool) -> Result<ImagePlane>
where
    I: ForeignImage + ?Sized,
{
    let mut channels = Vec::with_capacity(dims.size_c);
    for c in 0..dims.size_c {
        let raw = read_foreign(image, c + 1, z + 1, t + 1)?;
        channels.push(import_plane(raw, dims.size_x, dims.size_y, signed16)?);
    }
    Ok(ImagePlane::new(dims.size_x, dims.size_y, channels)?)
}

/// Reads the single colour channel at `(z, t)` and splits it into RGB.
fn read_color_plane<I>(
    image: &mut I,
    dims: Dimensions,
    z: usize,
    t: usize,
    image_type: ImageType,
    lut: Option<&Lut>,
) -> Result<ImagePlane>
where
    I: ForeignImage + ?Sized,
{
    let raw = read_foreign(image, 1, z + 1, t + 1)?;
    let channels = split_color(raw, dims.size_x, dims.size_y, image_type, lut)?;
    Ok(ImagePlane::new(dims.size_x, dims.size_y, channels)?)
}

fn read_foreign<I>(image: &mut I, c: usize, z: usize, t: usize) -> Result<&imgbridge_core::PlaneData>
where
    I: ForeignImage + ?Sized,
{
    image
        .read_plane(c, z, t)
        .map_err(|err| Error::CursorUnavailable {
            c,
            z,
            t,
            reason: err.to_string(),
        })
}

/// Converts a foreign image with default options.
///
/// # Errors
/// See [`Converter::foreign_to_native_into`].
pub fn convert_foreign_to_native<I>(
    image: &mut I,
    progress: Option<&mut dyn ProgressListener>,
) -> Result<Image5D>
where
    I: ForeignImage + ?Sized,
{
    let mut converter = Converter::default();
    if let Some(progress) = progress {
        converter = converter.with_progress(progress);
    }
    converter.foreign_to_native(image)
}

/// Converts a native image with default options.
///
/// # Errors
/// See [`Converter::native_to_foreign`].
pub fn convert_native_to_foreign(
    image: &Image5D,
    progress: Option<&mut dyn ProgressListener>,
) -> Result<StackImage> {
    let mut converter = Converter::default();
    if let Some(progress) = progress {
        converter = converter.with_progress(progress);
    }
    converter.native_to_foreign(image)
}
