//! 2D geometry primitives shared by native and foreign ROIs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in image pixel coordinates (sub-pixel precision).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle enclosing every point, or `None` for an empty set.
    ///
    /// A NaN coordinate anywhere makes the whole rectangle NaN.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = nan_min(min_x, p.x);
            min_y = nan_min(min_y, p.y);
            max_x = -nan_min(-max_x, -p.x);
            max_y = -nan_min(-max_y, -p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// Bottom-right corner.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Point2 {
        Point2::new(self.x + self.width, self.y + self.height)
    }

    /// Returns true if all fields are finite and the extents are non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Smallest rectangle enclosing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max = self.max();
        let other_max = other.max();
        Self::new(
            min_x,
            min_y,
            max.x.max(other_max.x) - min_x,
            max.y.max(other_max.y) - min_y,
        )
    }
}

/// One segment of a generic 2D path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PathSegment {
    MoveTo(Point2),
    LineTo(Point2),
    QuadTo(Point2, Point2),
    CubicTo(Point2, Point2, Point2),
    Close,
}

impl PathSegment {
    /// Control and end points of this segment, in drawing order.
    #[must_use]
    pub fn points(&self) -> Vec<Point2> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) => vec![p],
            Self::QuadTo(c, p) => vec![c, p],
            Self::CubicTo(c1, c2, p) => vec![c1, c2, p],
            Self::Close => Vec::new(),
        }
    }

    /// Returns this segment shifted by `(dx, dy)`.
    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(p.translate(dx, dy)),
            Self::LineTo(p) => Self::LineTo(p.translate(dx, dy)),
            Self::QuadTo(c, p) => Self::QuadTo(c.translate(dx, dy), p.translate(dx, dy)),
            Self::CubicTo(c1, c2, p) => Self::CubicTo(
                c1.translate(dx, dy),
                c2.translate(dx, dy),
                p.translate(dx, dy),
            ),
            Self::Close => Self::Close,
        }
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Bounds of all control points in a path, or `None` if it has none.
#[must_use]
pub fn path_bounds(segments: &[PathSegment]) -> Option<Rect> {
    let points: Vec<Point2> = segments.iter().flat_map(PathSegment::points).collect();
    Rect::from_points(&points)
}

/// An sRGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::GREEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_from_points() {
        let points = [
            Point2::new(1.5, 2.0),
            Point2::new(5.5, 2.0),
            Point2::new(5.5, 6.0),
        ];
        let rect = Rect::from_points(&points).unwrap();
        assert_relative_eq!(rect.x, 1.5);
        assert_relative_eq!(rect.y, 2.0);
        assert_relative_eq!(rect.width, 4.0);
        assert_relative_eq!(rect.height, 4.0);
        assert!(Rect::from_points(&[] as &[Point2]).is_none());
    }

    #[test]
    fn test_rect_from_points_keeps_nan() {
        for points in [
            [Point2::new(f64::NAN, 0.0), Point2::new(1.0, 1.0)],
            [Point2::new(0.0, 0.0), Point2::new(1.0, f64::NAN)],
        ] {
            let rect = Rect::from_points(&points).unwrap();
            assert!(!rect.is_valid());
        }
        let wide = [Point2::new(0.0, 0.0), Point2::new(f64::INFINITY, 1.0)];
        assert!(!Rect::from_points(&wide).unwrap().is_valid());
    }

    #[test]
    fn test_rect_validity() {
        assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, -1.0, 2.0).is_valid());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 2.0).is_valid());
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(1.0, -1.0, 4.0, 1.0);
        assert_eq!(a.union(&b), Rect::new(0.0, -1.0, 5.0, 3.0));
    }

    #[test]
    fn test_path_bounds_and_translate() {
        let segments = [
            PathSegment::MoveTo(Point2::new(2.0, 3.0)),
            PathSegment::CubicTo(
                Point2::new(4.0, 0.0),
                Point2::new(6.0, 9.0),
                Point2::new(8.0, 3.0),
            ),
            PathSegment::Close,
        ];
        assert_eq!(path_bounds(&segments), Some(Rect::new(2.0, 0.0, 6.0, 9.0)));

        let moved: Vec<PathSegment> = segments.iter().map(|s| s.translate(-2.0, 0.0)).collect();
        assert_eq!(moved[0], PathSegment::MoveTo(Point2::new(0.0, 3.0)));
        assert!(path_bounds(&[PathSegment::Close]).is_none());
    }
}
