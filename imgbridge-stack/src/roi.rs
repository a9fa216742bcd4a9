//! Foreign ROI taxonomy.
//!
//! A [`ForeignRoi`] carries its geometry, a 1-based `(c, z, t)` position and
//! optional display attributes. [`ForeignRoi::roi_type`] reports the numeric
//! type tag the toolkit uses for the geometry.

use imgbridge_core::{path_bounds, Color, PathSegment, Point2, Rect};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 1-based `(c, z, t)` position of a foreign ROI; 0 means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StackPosition {
    pub c: usize,
    pub z: usize,
    pub t: usize,
}

impl StackPosition {
    /// Position attached to no particular plane.
    pub const UNSET: Self = Self { c: 0, z: 0, t: 0 };

    #[inline]
    #[must_use]
    pub const fn new(c: usize, z: usize, t: usize) -> Self {
        Self { c, z, t }
    }
}

/// Toolkit ROI type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoiType {
    Rectangle,
    Oval,
    Polygon,
    FreeRoi,
    TracedRoi,
    Line,
    Polyline,
    FreeLine,
    Angle,
    Composite,
    Point,
    /// Any tag outside the known range.
    Other(u8),
}

impl RoiType {
    /// Numeric tag as stored by the toolkit.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Rectangle => 0,
            Self::Oval => 1,
            Self::Polygon => 2,
            Self::FreeRoi => 3,
            Self::TracedRoi => 4,
            Self::Line => 5,
            Self::Polyline => 6,
            Self::FreeLine => 7,
            Self::Angle => 8,
            Self::Composite => 9,
            Self::Point => 10,
            Self::Other(code) => code,
        }
    }

    /// Parses a numeric tag.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Rectangle,
            1 => Self::Oval,
            2 => Self::Polygon,
            3 => Self::FreeRoi,
            4 => Self::TracedRoi,
            5 => Self::Line,
            6 => Self::Polyline,
            7 => Self::FreeLine,
            8 => Self::Angle,
            9 => Self::Composite,
            10 => Self::Point,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for RoiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle => f.write_str("rectangle"),
            Self::Oval => f.write_str("oval"),
            Self::Polygon => f.write_str("polygon"),
            Self::FreeRoi => f.write_str("freehand"),
            Self::TracedRoi => f.write_str("traced"),
            Self::Line => f.write_str("line"),
            Self::Polyline => f.write_str("polyline"),
            Self::FreeLine => f.write_str("freeline"),
            Self::Angle => f.write_str("angle"),
            Self::Composite => f.write_str("composite"),
            Self::Point => f.write_str("point"),
            Self::Other(code) => write!(f, "type {code}"),
        }
    }
}

/// Flavour of a vertex-list ROI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolygonKind {
    Polygon,
    Traced,
    Freehand,
    Polyline,
    Freeline,
    Angle,
    Point,
}

impl PolygonKind {
    #[must_use]
    pub const fn roi_type(self) -> RoiType {
        match self {
            Self::Polygon => RoiType::Polygon,
            Self::Traced => RoiType::TracedRoi,
            Self::Freehand => RoiType::FreeRoi,
            Self::Polyline => RoiType::Polyline,
            Self::Freeline => RoiType::FreeLine,
            Self::Angle => RoiType::Angle,
            Self::Point => RoiType::Point,
        }
    }
}

/// Pixel mask of an image ROI; non-zero bytes are inside.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoiMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RoiMask {
    #[must_use]
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// True when the byte count matches the extent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.width * self.height
    }
}

/// Geometry of a foreign ROI.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoiGeometry {
    /// Rectangle, optionally with rounded corners.
    Rectangle { bounds: Rect, arc_size: u32 },
    Oval { bounds: Rect },
    /// Straight line between two sub-pixel endpoints.
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polygon {
        kind: PolygonKind,
        points: Vec<Point2>,
    },
    /// Generic shape; segments are relative to `(x, y)`.
    Shape {
        x: f64,
        y: f64,
        segments: Vec<PathSegment>,
    },
    /// Pixel mask drawn at `(x, y)`.
    Image {
        x: i32,
        y: i32,
        mask: RoiMask,
        opacity: f64,
    },
    /// Any other tag, known only by its bounds.
    Other { type_code: u8, bounds: Rect },
}

/// A foreign region of interest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForeignRoi {
    pub geometry: RoiGeometry,
    pub position: StackPosition,
    pub name: Option<String>,
    pub stroke_color: Option<Color>,
}

impl ForeignRoi {
    /// Creates an unnamed ROI at [`StackPosition::UNSET`].
    #[must_use]
    pub fn new(geometry: RoiGeometry) -> Self {
        Self {
            geometry,
            position: StackPosition::UNSET,
            name: None,
            stroke_color: None,
        }
    }

    #[must_use]
    pub fn rectangle(bounds: Rect) -> Self {
        Self::new(RoiGeometry::Rectangle {
            bounds,
            arc_size: 0,
        })
    }

    #[must_use]
    pub fn oval(bounds: Rect) -> Self {
        Self::new(RoiGeometry::Oval { bounds })
    }

    #[must_use]
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(RoiGeometry::Line { x1, y1, x2, y2 })
    }

    #[must_use]
    pub fn polygon(kind: PolygonKind, points: Vec<Point2>) -> Self {
        Self::new(RoiGeometry::Polygon { kind, points })
    }

    /// Multi-point ROI.
    #[must_use]
    pub fn points(points: Vec<Point2>) -> Self {
        Self::polygon(PolygonKind::Point, points)
    }

    #[must_use]
    pub fn shape(x: f64, y: f64, segments: Vec<PathSegment>) -> Self {
        Self::new(RoiGeometry::Shape { x, y, segments })
    }

    #[must_use]
    pub fn image(x: i32, y: i32, mask: RoiMask, opacity: f64) -> Self {
        Self::new(RoiGeometry::Image {
            x,
            y,
            mask,
            opacity,
        })
    }

    #[must_use]
    pub fn with_position(mut self, position: StackPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = Some(color);
        self
    }

    /// Toolkit type tag. Image ROIs report [`RoiType::Rectangle`].
    #[must_use]
    pub fn roi_type(&self) -> RoiType {
        match &self.geometry {
            RoiGeometry::Rectangle { .. } | RoiGeometry::Image { .. } => RoiType::Rectangle,
            RoiGeometry::Oval { .. } => RoiType::Oval,
            RoiGeometry::Line { .. } => RoiType::Line,
            RoiGeometry::Polygon { kind, .. } => kind.roi_type(),
            RoiGeometry::Shape { .. } => RoiType::Composite,
            RoiGeometry::Other { type_code, .. } => RoiType::from_code(*type_code),
        }
    }

    /// Sub-pixel bounding rectangle.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn float_bounds(&self) -> Rect {
        match &self.geometry {
            RoiGeometry::Rectangle { bounds, .. }
            | RoiGeometry::Oval { bounds }
            | RoiGeometry::Other { bounds, .. } => *bounds,
            RoiGeometry::Line { x1, y1, x2, y2 } => Rect::new(
                x1.min(*x2),
                y1.min(*y2),
                (x2 - x1).abs(),
                (y2 - y1).abs(),
            ),
            RoiGeometry::Polygon { points, .. } => {
                Rect::from_points(points).unwrap_or_default()
            }
            RoiGeometry::Shape { x, y, segments } => {
                let absolute: Vec<PathSegment> =
                    segments.iter().map(|s| s.translate(*x, *y)).collect();
                path_bounds(&absolute).unwrap_or(Rect::new(*x, *y, 0.0, 0.0))
            }
            RoiGeometry::Image { x, y, mask, .. } => Rect::new(
                f64::from(*x),
                f64::from(*y),
                mask.width as f64,
                mask.height as f64,
            ),
        }
    }

    /// Vertices; rectangles and other area ROIs report their bounding corners.
    #[must_use]
    pub fn float_polygon(&self) -> Vec<Point2> {
        match &self.geometry {
            RoiGeometry::Polygon { points, .. } => points.clone(),
            RoiGeometry::Line { x1, y1, x2, y2 } => {
                vec![Point2::new(*x1, *y1), Point2::new(*x2, *y2)]
            }
            _ => {
                let b = self.float_bounds();
                vec![
                    Point2::new(b.x, b.y),
                    Point2::new(b.x + b.width, b.y),
                    Point2::new(b.x + b.width, b.y + b.height),
                    Point2::new(b.x, b.y + b.height),
                ]
            }
        }
    }

    /// Endpoints of a straight line ROI.
    #[must_use]
    pub fn line_endpoints(&self) -> Option<(Point2, Point2)> {
        match self.geometry {
            RoiGeometry::Line { x1, y1, x2, y2 } => {
                Some((Point2::new(x1, y1), Point2::new(x2, y2)))
            }
            _ => None,
        }
    }

    /// Origin and relative segments of a shape ROI.
    #[must_use]
    pub fn shape_path(&self) -> Option<(Point2, &[PathSegment])> {
        match &self.geometry {
            RoiGeometry::Shape { x, y, segments } => Some((Point2::new(*x, *y), segments)),
            _ => None,
        }
    }
}
