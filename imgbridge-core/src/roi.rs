//! Native 2D ROI taxonomy.
//!
//! Every ROI is a tagged variant over its geometry plus a `(c, z, t)`
//! position, a display name and a colour. Positions are zero-based and
//! `-1` on an axis means the ROI applies to every index on that axis.

use crate::error::{Error, Result};
use crate::geometry::{path_bounds, Color, PathSegment, Point2, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Zero-based `(c, z, t)` position of a ROI; `-1` means "any".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoiPosition {
    pub c: i32,
    pub z: i32,
    pub t: i32,
}

impl RoiPosition {
    /// Position matching every channel, slice and frame.
    pub const ANY: Self = Self {
        c: -1,
        z: -1,
        t: -1,
    };

    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(c: i32, z: i32, t: i32) -> Self {
        Self { c, z, t }
    }
}

impl Default for RoiPosition {
    fn default() -> Self {
        Self::ANY
    }
}

/// A generic path positioned at `origin`; segment coordinates are relative to it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathShape {
    pub origin: Point2,
    pub segments: Vec<PathSegment>,
}

impl PathShape {
    /// Creates a path at `origin`.
    #[must_use]
    pub fn new(origin: Point2, segments: Vec<PathSegment>) -> Self {
        Self { origin, segments }
    }

    /// Segments in absolute image coordinates.
    #[must_use]
    pub fn absolute_segments(&self) -> Vec<PathSegment> {
        self.segments
            .iter()
            .map(|s| s.translate(self.origin.x, self.origin.y))
            .collect()
    }
}

/// A pixel mask ROI whose top-left pixel sits at `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AreaMask {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major membership bits, `width * height` long.
    pub bits: Vec<bool>,
    /// Painter alpha in `[0, 1]`.
    pub opacity: f32,
}

impl AreaMask {
    /// Creates a mask, checking the bit count against the extent.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRoi`] when `bits.len() != width * height`.
    pub fn new(x: i32, y: i32, width: usize, height: usize, bits: Vec<bool>) -> Result<Self> {
        let mask = Self {
            x,
            y,
            width,
            height,
            bits,
            opacity: 1.0,
        };
        mask.validate()?;
        Ok(mask)
    }

    /// Sets the painter alpha.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Checks that the bit count matches the extent.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRoi`] on a size mismatch.
    pub fn validate(&self) -> Result<()> {
        if self.bits.len() == self.width * self.height {
            Ok(())
        } else {
            Err(Error::InvalidRoi(format!(
                "area mask has {} bits for a {}x{} extent",
                self.bits.len(),
                self.width,
                self.height
            )))
        }
    }
}

/// ROI geometry, one arm per native variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoiShape {
    Rectangle(Rect),
    Ellipse(Rect),
    Line { p1: Point2, p2: Point2 },
    /// Closed polygon; vertex order is significant.
    Polygon(Vec<Point2>),
    /// Open polyline; vertex order is significant.
    Polyline(Vec<Point2>),
    Path(PathShape),
    Point(Point2),
    Area(AreaMask),
}

impl RoiShape {
    /// Short lowercase name of the variant.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Rectangle(_) => "rectangle",
            Self::Ellipse(_) => "ellipse",
            Self::Line { .. } => "line",
            Self::Polygon(_) => "polygon",
            Self::Polyline(_) => "polyline",
            Self::Path(_) => "path",
            Self::Point(_) => "point",
            Self::Area(_) => "area",
        }
    }
}

/// A native 2D region of interest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roi2D {
    pub shape: RoiShape,
    pub position: RoiPosition,
    pub name: String,
    pub color: Color,
    pub selected: bool,
}

impl Roi2D {
    /// Creates an unselected ROI at [`RoiPosition::ANY`].
    #[must_use]
    pub fn new(shape: RoiShape) -> Self {
        Self {
            shape,
            position: RoiPosition::ANY,
            name: String::new(),
            color: Color::default(),
            selected: false,
        }
    }

    #[must_use]
    pub fn rectangle(bounds: Rect) -> Self {
        Self::new(RoiShape::Rectangle(bounds))
    }

    #[must_use]
    pub fn ellipse(bounds: Rect) -> Self {
        Self::new(RoiShape::Ellipse(bounds))
    }

    #[must_use]
    pub fn line(p1: Point2, p2: Point2) -> Self {
        Self::new(RoiShape::Line { p1, p2 })
    }

    #[must_use]
    pub fn polygon(points: Vec<Point2>) -> Self {
        Self::new(RoiShape::Polygon(points))
    }

    #[must_use]
    pub fn polyline(points: Vec<Point2>) -> Self {
        Self::new(RoiShape::Polyline(points))
    }

    #[must_use]
    pub fn point(p: Point2) -> Self {
        Self::new(RoiShape::Point(p))
    }

    /// Sets the `(c, z, t)` position.
    #[must_use]
    pub fn with_position(mut self, position: RoiPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the display colour.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Control points of shape ROIs; empty for areas.
    ///
    /// Rectangles and ellipses report their top-left and bottom-right
    /// corners, paths report every segment point in absolute coordinates.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        match &self.shape {
            RoiShape::Rectangle(r) | RoiShape::Ellipse(r) => vec![r.origin(), r.max()],
            RoiShape::Line { p1, p2 } => vec![*p1, *p2],
            RoiShape::Polygon(pts) | RoiShape::Polyline(pts) => pts.clone(),
            RoiShape::Path(path) => path
                .absolute_segments()
                .iter()
                .flat_map(PathSegment::points)
                .collect(),
            RoiShape::Point(p) => vec![*p],
            RoiShape::Area(_) => Vec::new(),
        }
    }

    /// Enclosing rectangle, or `None` when the geometry has no points.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match &self.shape {
            RoiShape::Rectangle(r) | RoiShape::Ellipse(r) => Some(*r),
            RoiShape::Path(path) => path_bounds(&path.absolute_segments()),
            RoiShape::Area(mask) => Some(Rect::new(
                f64::from(mask.x),
                f64::from(mask.y),
                mask.width as f64,
                mask.height as f64,
            )),
            _ => Rect::from_points(&self.points()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_roi_defaults() {
        let roi = Roi2D::point(Point2::new(1.0, 2.0));
        assert_eq!(roi.position, RoiPosition::ANY);
        assert!(!roi.selected);
        assert!(roi.name.is_empty());
        assert_eq!(roi.shape.kind_name(), "point");
    }

    #[test]
    fn test_polygon_bounds_keep_vertex_order() {
        let pts = vec![
            Point2::new(5.5, 6.0),
            Point2::new(1.5, 2.0),
            Point2::new(5.5, 2.0),
        ];
        let roi = Roi2D::polygon(pts.clone());
        assert_eq!(roi.points(), pts);
        let b = roi.bounds().unwrap();
        assert_relative_eq!(b.x, 1.5);
        assert_relative_eq!(b.width, 4.0);
    }

    #[test]
    fn test_empty_polygon_has_no_bounds() {
        assert!(Roi2D::polygon(Vec::new()).bounds().is_none());
    }

    #[test]
    fn test_path_bounds_are_absolute() {
        let path = PathShape::new(
            Point2::new(10.0, 20.0),
            vec![
                PathSegment::MoveTo(Point2::new(0.0, 0.0)),
                PathSegment::LineTo(Point2::new(4.0, 2.0)),
                PathSegment::Close,
            ],
        );
        let roi = Roi2D::new(RoiShape::Path(path));
        assert_eq!(roi.bounds(), Some(Rect::new(10.0, 20.0, 4.0, 2.0)));
    }

    #[test]
    fn test_area_mask_validation() {
        assert!(AreaMask::new(0, 0, 2, 2, vec![true; 3]).is_err());
        let mask = AreaMask::new(3, 4, 2, 2, vec![true, false, false, true]).unwrap();
        assert_eq!(mask.bits, vec![true, false, false, true]);
        let roi = Roi2D::new(RoiShape::Area(mask));
        assert_eq!(roi.bounds(), Some(Rect::new(3.0, 4.0, 2.0, 2.0)));
    }
}
