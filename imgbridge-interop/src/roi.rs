//! ROI translation.
//!
//! The strict functions reject malformed geometry with
//! [`Error::MalformedRoi`]. The lenient ones used during image conversion
//! substitute a rectangle over the ROI bounds instead, report the error on the
//! diagnostic channel, and drop the ROI only when even its bounds are not
//! finite.

use crate::diagnostics::{report, DiagnosticListener};
use crate::error::{Error, Result};
use imgbridge_core::{AreaMask, PathSegment, PathShape, Point2, Rect, Roi2D, RoiPosition, RoiShape};
use imgbridge_stack::{ForeignRoi, PolygonKind, RoiGeometry, RoiMask, RoiType, StackPosition};

/// Zero-based native position for a 1-based foreign one; unset becomes "any".
#[must_use]
pub fn native_position(position: StackPosition) -> RoiPosition {
    RoiPosition::new(
        zero_based(position.c),
        zero_based(position.z),
        zero_based(position.t),
    )
}

/// 1-based foreign position for a zero-based native one; "any" becomes unset.
#[must_use]
pub fn foreign_position(position: RoiPosition) -> StackPosition {
    StackPosition::new(
        one_based(position.c),
        one_based(position.z),
        one_based(position.t),
    )
}

fn zero_based(index: usize) -> i32 {
    i32::try_from(index).map_or(-1, |i| i - 1)
}

fn one_based(index: i32) -> usize {
    usize::try_from(index.saturating_add(1)).unwrap_or(0)
}

/// Translates a foreign ROI into one or more native ROIs.
///
/// Multi-point ROIs fan out into one native point per vertex. Every output
/// shares the source position, name and colour and starts unselected.
///
/// # Errors
/// Returns [`Error::MalformedRoi`] for non-finite coordinates, negative
/// extents, empty vertex lists or paths, and inconsistent masks.
pub fn foreign_roi_to_native(roi: &ForeignRoi) -> Result<Vec<Roi2D>> {
    let shapes = match &roi.geometry {
        RoiGeometry::Rectangle { bounds, .. } => vec![RoiShape::Rectangle(checked_rect(*bounds)?)],
        RoiGeometry::Other { type_code, bounds } => match roi.roi_type() {
            RoiType::Rectangle | RoiType::Other(_) => {
                vec![RoiShape::Rectangle(checked_rect(*bounds)?)]
            }
            RoiType::Oval => vec![RoiShape::Ellipse(checked_rect(*bounds)?)],
            tag => {
                return Err(Error::MalformedRoi(format!(
                    "type code {type_code} ({tag}) carries bounds only"
                )))
            }
        },
        RoiGeometry::Image { mask, .. } => {
            if !mask.is_consistent() {
                return Err(Error::MalformedRoi(format!(
                    "mask holds {} bytes for {}x{}",
                    mask.data.len(),
                    mask.width,
                    mask.height
                )));
            }
            vec![RoiShape::Rectangle(checked_rect(roi.float_bounds())?)]
        }
        RoiGeometry::Oval { bounds } => vec![RoiShape::Ellipse(checked_rect(*bounds)?)],
        RoiGeometry::Line { x1, y1, x2, y2 } => vec![RoiShape::Line {
            p1: checked_point(Point2::new(*x1, *y1))?,
            p2: checked_point(Point2::new(*x2, *y2))?,
        }],
        RoiGeometry::Polygon { kind, points } => {
            checked_points(points)?;
            match kind {
                PolygonKind::Polygon | PolygonKind::Traced | PolygonKind::Freehand => {
                    vec![RoiShape::Polygon(points.clone())]
                }
                PolygonKind::Polyline | PolygonKind::Freeline | PolygonKind::Angle => {
                    vec![RoiShape::Polyline(points.clone())]
                }
                PolygonKind::Point => points.iter().copied().map(RoiShape::Point).collect(),
            }
        }
        RoiGeometry::Shape { x, y, segments } => {
            let origin = checked_point(Point2::new(*x, *y))?;
            checked_segments(segments)?;
            vec![RoiShape::Path(PathShape::new(origin, segments.clone()))]
        }
    };
    let position = native_position(roi.position);
    Ok(shapes
        .into_iter()
        .map(|shape| native_roi(roi, shape, position))
        .collect())
}

/// Translates a native ROI into a foreign one.
///
/// # Errors
/// Returns [`Error::MalformedRoi`] under the same conditions as
/// [`foreign_roi_to_native`].
pub fn native_roi_to_foreign(roi: &Roi2D) -> Result<ForeignRoi> {
    let geometry = match &roi.shape {
        RoiShape::Point(p) => RoiGeometry::Polygon {
            kind: PolygonKind::Point,
            points: vec![checked_point(*p)?],
        },
        RoiShape::Line { p1, p2 } => {
            let (p1, p2) = (checked_point(*p1)?, checked_point(*p2)?);
            RoiGeometry::Line {
                x1: p1.x,
                y1: p1.y,
                x2: p2.x,
                y2: p2.y,
            }
        }
        RoiShape::Rectangle(bounds) => RoiGeometry::Rectangle {
            bounds: checked_rect(*bounds)?,
            arc_size: 0,
        },
        RoiShape::Ellipse(bounds) => RoiGeometry::Oval {
            bounds: checked_rect(*bounds)?,
        },
        RoiShape::Polyline(points) => RoiGeometry::Polygon {
            kind: PolygonKind::Polyline,
            points: checked_points(points)?.to_vec(),
        },
        RoiShape::Polygon(points) => RoiGeometry::Polygon {
            kind: PolygonKind::Polygon,
            points: checked_points(points)?.to_vec(),
        },
        RoiShape::Path(path) => {
            let origin = checked_point(path.origin)?;
            RoiGeometry::Shape {
                x: origin.x,
                y: origin.y,
                segments: checked_segments(&path.segments)?.to_vec(),
            }
        }
        RoiShape::Area(mask) => image_geometry(mask)?,
    };
    Ok(ForeignRoi {
        geometry,
        position: foreign_position(roi.position),
        name: (!roi.name.is_empty()).then(|| roi.name.clone()),
        stroke_color: Some(roi.color),
    })
}

/// [`foreign_roi_to_native`] with rectangular fallback.
pub fn foreign_roi_to_native_lenient(
    roi: &ForeignRoi,
    diagnostics: Option<&mut dyn DiagnosticListener>,
) -> Vec<Roi2D> {
    match foreign_roi_to_native(roi) {
        Ok(rois) => rois,
        Err(err) => match fallback_bounds(roi.float_bounds()) {
            Some(bounds) => {
                report(diagnostics, &err, "substituting rectangular bounds");
                let position = native_position(roi.position);
                vec![native_roi(roi, RoiShape::Rectangle(bounds), position)]
            }
            None => {
                report(diagnostics, &err, "bounds not finite, ROI dropped");
                Vec::new()
            }
        },
    }
}

/// [`native_roi_to_foreign`] with rectangular fallback.
pub fn native_roi_to_foreign_lenient(
    roi: &Roi2D,
    diagnostics: Option<&mut dyn DiagnosticListener>,
) -> Option<ForeignRoi> {
    match native_roi_to_foreign(roi) {
        Ok(foreign) => Some(foreign),
        Err(err) => match roi.bounds().and_then(fallback_bounds) {
            Some(bounds) => {
                report(diagnostics, &err, "substituting rectangular bounds");
                let mut fallback = ForeignRoi::rectangle(bounds)
                    .with_position(foreign_position(roi.position))
                    .with_stroke_color(roi.color);
                if !roi.name.is_empty() {
                    fallback = fallback.with_name(roi.name.as_str());
                }
                Some(fallback)
            }
            None => {
                report(diagnostics, &err, "bounds not finite, ROI dropped");
                None
            }
        },
    }
}

fn native_roi(source: &ForeignRoi, shape: RoiShape, position: RoiPosition) -> Roi2D {
    let mut roi = Roi2D::new(shape).with_position(position);
    if let Some(name) = &source.name {
        roi.name.clone_from(name);
    }
    if let Some(color) = source.stroke_color {
        roi.color = color;
    }
    roi
}

fn image_geometry(mask: &AreaMask) -> Result<RoiGeometry> {
    mask.validate()?;
    let data = mask.bits.iter().map(|&inside| if inside { 255 } else { 0 }).collect();
    Ok(RoiGeometry::Image {
        x: mask.x,
        y: mask.y,
        mask: RoiMask::new(mask.width, mask.height, data),
        opacity: f64::from(mask.opacity),
    })
}

fn checked_point(p: Point2) -> Result<Point2> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(Error::MalformedRoi(format!(
            "non-finite coordinate ({}, {})",
            p.x, p.y
        )))
    }
}

fn checked_points(points: &[Point2]) -> Result<&[Point2]> {
    if points.is_empty() {
        return Err(Error::MalformedRoi("empty vertex list".to_string()));
    }
    for p in points {
        checked_point(*p)?;
    }
    Ok(points)
}

fn checked_rect(r: Rect) -> Result<Rect> {
    if r.is_valid() {
        Ok(r)
    } else {
        Err(Error::MalformedRoi(format!(
            "invalid bounds x={} y={} w={} h={}",
            r.x, r.y, r.width, r.height
        )))
    }
}

fn checked_segments(segments: &[PathSegment]) -> Result<&[PathSegment]> {
    if segments.iter().all(|s| matches!(s, PathSegment::Close)) {
        return Err(Error::MalformedRoi("empty path".to_string()));
    }
    for segment in segments {
        for p in segment.points() {
            checked_point(p)?;
        }
    }
    Ok(segments)
}

/// Finite bounds with negative extents flipped; `None` if not finite.
fn fallback_bounds(r: Rect) -> Option<Rect> {
    let finite =
        r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite();
    finite.then(|| {
        Rect::new(
            r.x.min(r.x + r.width),
            r.y.min(r.y + r.height),
            r.width.abs(),
            r.height.abs(),
        )
    })
}
