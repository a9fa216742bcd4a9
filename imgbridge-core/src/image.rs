//! The native 5D image and its scoped update window.
//!
//! An [`Image5D`] stores one multi-channel [`ImagePlane`] per `(t, z)` pair,
//! together with calibration, ROIs and change listeners. Mutations notify
//! listeners immediately, unless they happen inside an update window opened
//! with [`Image5D::begin_update`]: the window stages every change on a copy and
//! only [`UpdateGuard::commit`] makes them visible, delivering all queued
//! events as a single batch. A guard dropped without committing discards the
//! staged copy.

use crate::calibration::Calibration;
use crate::error::{Error, Result};
use crate::pixel::{DataType, PlaneData};
use crate::roi::Roi2D;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The five sizes of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    pub size_x: usize,
    pub size_y: usize,
    pub size_z: usize,
    pub size_t: usize,
    pub size_c: usize,
}

impl Dimensions {
    /// Creates a dimension record in `(x, y, z, t, c)` order.
    #[must_use]
    pub const fn new(size_x: usize, size_y: usize, size_z: usize, size_t: usize, size_c: usize) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            size_t,
            size_c,
        }
    }

    /// Samples in one 2D plane.
    #[must_use]
    pub const fn plane_len(&self) -> usize {
        self.size_x * self.size_y
    }

    /// Number of multi-channel planes, `size_z * size_t`.
    #[must_use]
    pub const fn plane_count(&self) -> usize {
        self.size_z * self.size_t
    }

    /// Number of single-channel 2D slices, `size_c * size_z * size_t`.
    #[must_use]
    pub const fn slice_count(&self) -> usize {
        self.size_c * self.size_z * self.size_t
    }

    /// Checks that every size is at least 1.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimensions`] if any size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.size_x == 0
            || self.size_y == 0
            || self.size_z == 0
            || self.size_t == 0
            || self.size_c == 0
        {
            return Err(Error::InvalidDimensions {
                size_x: self.size_x,
                size_y: self.size_y,
                size_z: self.size_z,
                size_t: self.size_t,
                size_c: self.size_c,
            });
        }
        Ok(())
    }
}

/// All channels of one `(t, z)` position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImagePlane {
    width: usize,
    height: usize,
    channels: Vec<PlaneData>,
}

impl ImagePlane {
    /// Builds a plane from per-channel buffers.
    ///
    /// # Errors
    /// Fails if there is no channel, if a channel length is not
    /// `width * height`, or if channels disagree on their data type.
    pub fn new(width: usize, height: usize, channels: Vec<PlaneData>) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(Error::ChannelCount {
                expected: 1,
                found: 0,
            });
        };
        let data_type = first.data_type();
        for channel in &channels {
            if channel.len() != width * height {
                return Err(Error::PlaneLength {
                    expected: width * height,
                    found: channel.len(),
                });
            }
            if channel.data_type() != data_type {
                return Err(Error::DataTypeMismatch {
                    expected: data_type,
                    found: channel.data_type(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            channels,
        })
    }

    /// Zero-filled plane.
    ///
    /// # Errors
    /// Fails if `size_c` is zero.
    pub fn zeros(width: usize, height: usize, size_c: usize, data_type: DataType) -> Result<Self> {
        if size_c == 0 {
            return Err(Error::ChannelCount {
                expected: 1,
                found: 0,
            });
        }
        Ok(Self {
            width,
            height,
            channels: (0..size_c)
                .map(|_| PlaneData::zeros(data_type, width * height))
                .collect(),
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of channels.
    #[must_use]
    pub fn size_c(&self) -> usize {
        self.channels.len()
    }

    /// Shared data type of every channel.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.channels[0].data_type()
    }

    /// Buffer of channel `c`.
    #[must_use]
    pub fn channel(&self, c: usize) -> Option<&PlaneData> {
        self.channels.get(c)
    }

    #[must_use]
    pub fn channels(&self) -> &[PlaneData] {
        &self.channels
    }
}

/// A change made to an [`Image5D`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEvent {
    Cleared,
    NameChanged,
    PlaneChanged { t: usize, z: usize },
    RoiAdded { index: usize },
    CalibrationChanged,
}

/// Observer of image changes.
pub trait ImageListener {
    /// Receives one batch of events; never called with an empty batch.
    fn image_changed(&mut self, events: &[ImageEvent]);
}

impl<F> ImageListener for F
where
    F: FnMut(&[ImageEvent]),
{
    fn image_changed(&mut self, events: &[ImageEvent]) {
        self(events);
    }
}

/// Listener registry. Cloning yields an empty registry.
#[derive(Default)]
struct Listeners(Vec<Box<dyn ImageListener>>);

impl Listeners {
    fn notify(&mut self, events: &[ImageEvent]) {
        if events.is_empty() {
            return;
        }
        for listener in &mut self.0 {
            listener.image_changed(events);
        }
    }
}

impl Clone for Listeners {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} listener(s)", self.0.len())
    }
}

/// A native 5D image: X, Y, Z, T and C with a single sample type.
///
/// Planes are stored per `(t, z)`; the first installed plane fixes width,
/// height, channel count and data type, and `size_z`/`size_t` grow to cover
/// every installed position. Cloning copies the content but not the listeners.
#[derive(Debug, Clone)]
pub struct Image5D {
    name: String,
    size_x: usize,
    size_y: usize,
    size_z: usize,
    size_t: usize,
    size_c: usize,
    data_type: Option<DataType>,
    planes: BTreeMap<(usize, usize), ImagePlane>,
    calibration: Calibration,
    rois: Vec<Roi2D>,
    listeners: Listeners,
    pending: Option<Vec<ImageEvent>>,
}

impl Image5D {
    /// Creates an image with no planes.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_x: 0,
            size_y: 0,
            size_z: 0,
            size_t: 0,
            size_c: 0,
            data_type: None,
            planes: BTreeMap::new(),
            calibration: Calibration::default(),
            rois: Vec::new(),
            listeners: Listeners::default(),
            pending: None,
        }
    }

    /// Creates a complete, zero-filled image.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDimensions`] if any size is zero.
    pub fn new(name: impl Into<String>, dims: Dimensions, data_type: DataType) -> Result<Self> {
        dims.validate()?;
        let mut image = Self::empty(name);
        image.size_x = dims.size_x;
        image.size_y = dims.size_y;
        image.size_z = dims.size_z;
        image.size_t = dims.size_t;
        image.size_c = dims.size_c;
        image.data_type = Some(data_type);
        for t in 0..dims.size_t {
            for z in 0..dims.size_z {
                let plane = ImagePlane::zeros(dims.size_x, dims.size_y, dims.size_c, data_type)?;
                image.planes.insert((t, z), plane);
            }
        }
        Ok(image)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.emit(ImageEvent::NameChanged);
    }

    #[must_use]
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    #[must_use]
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    #[must_use]
    pub fn size_z(&self) -> usize {
        self.size_z
    }

    #[must_use]
    pub fn size_t(&self) -> usize {
        self.size_t
    }

    #[must_use]
    pub fn size_c(&self) -> usize {
        self.size_c
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.size_x, self.size_y, self.size_z, self.size_t, self.size_c)
    }

    /// Sample type, or `None` before the first plane is installed.
    #[must_use]
    pub fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// True if no plane has been installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// True when a plane exists for every `(t, z)` in range.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.planes.is_empty() && self.planes.len() == self.size_z * self.size_t
    }

    /// Installs `plane` at `(t, z)`, replacing any previous plane.
    ///
    /// # Errors
    /// Fails when the plane's width, height, channel count or data type
    /// disagrees with planes already installed.
    pub fn set_plane(&mut self, t: usize, z: usize, plane: ImagePlane) -> Result<()> {
        if plane.size_c() == 0 {
            return Err(Error::ChannelCount {
                expected: self.size_c.max(1),
                found: 0,
            });
        }
        if let Some(data_type) = self.data_type {
            if plane.width() != self.size_x || plane.height() != self.size_y {
                return Err(Error::ShapeMismatch {
                    expected_width: self.size_x,
                    expected_height: self.size_y,
                    width: plane.width(),
                    height: plane.height(),
                });
            }
            if plane.size_c() != self.size_c {
                return Err(Error::ChannelCount {
                    expected: self.size_c,
                    found: plane.size_c(),
                });
            }
            if plane.data_type() != data_type {
                return Err(Error::DataTypeMismatch {
                    expected: data_type,
                    found: plane.data_type(),
                });
            }
        } else {
            self.size_x = plane.width();
            self.size_y = plane.height();
            self.size_c = plane.size_c();
            self.data_type = Some(plane.data_type());
        }
        self.size_z = self.size_z.max(z + 1);
        self.size_t = self.size_t.max(t + 1);
        self.planes.insert((t, z), plane);
        self.emit(ImageEvent::PlaneChanged { t, z });
        Ok(())
    }

    /// Plane at `(t, z)`.
    #[must_use]
    pub fn plane(&self, t: usize, z: usize) -> Option<&ImagePlane> {
        self.planes.get(&(t, z))
    }

    /// Single-channel buffer at `(t, z, c)`.
    #[must_use]
    pub fn data_xy(&self, t: usize, z: usize, c: usize) -> Option<&PlaneData> {
        self.plane(t, z).and_then(|plane| plane.channel(c))
    }

    /// Planes in `(t, z)` order.
    pub fn planes(&self) -> impl Iterator<Item = ((usize, usize), &ImagePlane)> {
        self.planes.iter().map(|(&key, plane)| (key, plane))
    }

    #[must_use]
    pub fn rois(&self) -> &[Roi2D] {
        &self.rois
    }

    pub fn add_roi(&mut self, roi: Roi2D) {
        self.rois.push(roi);
        let index = self.rois.len() - 1;
        self.emit(ImageEvent::RoiAdded { index });
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
        self.emit(ImageEvent::CalibrationChanged);
    }

    /// Drops planes, ROIs and calibration; keeps the name and listeners.
    pub fn clear(&mut self) {
        self.size_x = 0;
        self.size_y = 0;
        self.size_z = 0;
        self.size_t = 0;
        self.size_c = 0;
        self.data_type = None;
        self.planes.clear();
        self.rois.clear();
        self.calibration = Calibration::default();
        self.emit(ImageEvent::Cleared);
    }

    /// Registers a change listener.
    pub fn add_listener(&mut self, listener: impl ImageListener + 'static) {
        self.listeners.0.push(Box::new(listener));
    }

    /// Opens an update window; see the module docs.
    pub fn begin_update(&mut self) -> UpdateGuard<'_> {
        let mut staged = self.clone();
        staged.pending = Some(Vec::new());
        UpdateGuard {
            target: self,
            staged,
            committed: false,
        }
    }

    /// Opens an update window whose stage starts out cleared.
    ///
    /// Behaves like [`Image5D::begin_update`] followed by [`Image5D::clear`]
    /// but never copies the current planes.
    pub fn begin_replace(&mut self) -> UpdateGuard<'_> {
        let mut staged = Self::empty(self.name.clone());
        staged.pending = Some(vec![ImageEvent::Cleared]);
        UpdateGuard {
            target: self,
            staged,
            committed: false,
        }
    }

    fn emit(&mut self, event: ImageEvent) {
        match self.pending.as_mut() {
            Some(pending) => {
                if pending.last() != Some(&event) {
                    pending.push(event);
                }
            }
            None => self.listeners.notify(&[event]),
        }
    }

    fn emit_batch(&mut self, events: Vec<ImageEvent>) {
        match self.pending.as_mut() {
            Some(pending) => pending.extend(events),
            None => self.listeners.notify(&events),
        }
    }
}

/// Scoped update window on an [`Image5D`].
///
/// Dereferences to the staged copy. Changes reach the image only through
/// [`UpdateGuard::commit`]; dropping the guard otherwise discards them.
pub struct UpdateGuard<'a> {
    target: &'a mut Image5D,
    staged: Image5D,
    committed: bool,
}

impl UpdateGuard<'_> {
    /// Publishes the staged content and delivers the queued events as one batch.
    pub fn commit(mut self) {
        let events = self.staged.pending.take().unwrap_or_default();
        let staged = std::mem::replace(&mut self.staged, Image5D::empty(String::new()));
        let listeners = std::mem::take(&mut self.target.listeners);
        let outer_pending = self.target.pending.take();
        *self.target = staged;
        self.target.listeners = listeners;
        self.target.pending = outer_pending;
        self.committed = true;
        self.target.emit_batch(events);
    }
}

impl Deref for UpdateGuard<'_> {
    type Target = Image5D;

    fn deref(&self) -> &Image5D {
        &self.staged
    }
}

impl DerefMut for UpdateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Image5D {
        &mut self.staged
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let discarded = self.staged.pending.as_ref().map_or(0, Vec::len);
            log::debug!(
                "update window on '{}' closed without commit, {} staged change(s) discarded",
                self.target.name,
                discarded
            );
        }
    }
}
