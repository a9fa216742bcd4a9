#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
use imgbridge_core::{
    Calibration, Color, DataType, Dimensions, Image5D, ImageEvent, ImagePlane, PlaneData, Point2,
    Rect, Roi2D, RoiPosition, RoiShape,
};
use imgbridge_interop::{
    convert_foreign_to_native, convert_native_to_foreign, foreign_roi_to_native,
    native_roi_to_foreign, ConversionOptions, Converter, Error,
};
use imgbridge_stack::{
    ForeignImage, ForeignRoi, ImageStack, ImageType, Lut, PolygonKind, StackImage, StackPosition,
};
use std::cell::RefCell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A plane of `data_type` whose samples differ per `(t, z, c)` and per pixel.
fn patterned(data_type: DataType, len: usize, seed: usize) -> PlaneData {
    match data_type {
        DataType::U8 => PlaneData::U8((0..len).map(|i| (i * 7 + seed) as u8).collect()),
        DataType::U16 => PlaneData::U16((0..len).map(|i| (i * 1009 + seed) as u16).collect()),
        DataType::I16 => PlaneData::I16(
            (0..len)
                .map(|i| ((i * 1009 + seed) as i16).wrapping_sub(20_000))
                .collect(),
        ),
        DataType::U32 => PlaneData::U32((0..len).map(|i| u32::MAX - (i + seed) as u32).collect()),
        DataType::I32 => PlaneData::I32((0..len).map(|i| -((i * 31 + seed) as i32)).collect()),
        DataType::F32 => PlaneData::F32((0..len).map(|i| i as f32 * 0.25 - seed as f32).collect()),
        DataType::F64 => PlaneData::F64((0..len).map(|i| (i as f64).sqrt() + seed as f64).collect()),
        DataType::Rgb24 => PlaneData::Rgb24((0..len).map(|i| ((i + seed) as u32) & 0x00FF_FFFF).collect()),
    }
}

fn patterned_image(dims: Dimensions, data_type: DataType) -> Image5D {
    let mut image = Image5D::empty("patterned");
    for t in 0..dims.size_t {
        for z in 0..dims.size_z {
            let channels = (0..dims.size_c)
                .map(|c| patterned(data_type, dims.plane_len(), c + 10 * z + 100 * t))
                .collect();
            let plane = ImagePlane::new(dims.size_x, dims.size_y, channels).unwrap();
            image.set_plane(t, z, plane).unwrap();
        }
    }
    image
}

const GRAY_TYPES: [DataType; 7] = [
    DataType::U8,
    DataType::U16,
    DataType::I16,
    DataType::U32,
    DataType::I32,
    DataType::F32,
    DataType::F64,
];

#[test]
fn test_dimensions_and_plane_count_preserved() {
    init_logging();
    for dims in [
        Dimensions::new(3, 2, 1, 1, 1),
        Dimensions::new(4, 3, 2, 3, 2),
        Dimensions::new(1, 5, 4, 1, 6),
    ] {
        let native = patterned_image(dims, DataType::U16);
        let mut foreign = convert_native_to_foreign(&native, None).unwrap();
        assert_eq!(foreign.dimensions(), dims);
        assert_eq!(foreign.stack().size(), dims.slice_count());

        let back = convert_foreign_to_native(&mut foreign, None).unwrap();
        assert_eq!(back.dimensions(), dims);
        assert!(back.is_complete());
    }
}

#[test]
fn test_pixel_round_trip_for_every_gray_type() {
    init_logging();
    let dims = Dimensions::new(5, 3, 2, 2, 3);
    for data_type in GRAY_TYPES {
        let native = patterned_image(dims, data_type);
        let mut foreign = convert_native_to_foreign(&native, None).unwrap();
        assert!(!foreign.is_signed16());
        let back = convert_foreign_to_native(&mut foreign, None).unwrap();
        assert_eq!(back.data_type(), Some(data_type), "{data_type}");
        for ((key, original), (back_key, copy)) in native.planes().zip(back.planes()) {
            assert_eq!(key, back_key);
            assert_eq!(original, copy, "{data_type} plane {key:?}");
        }
    }
}

#[test]
fn test_signed16_bias_applies_to_every_channel() {
    init_logging();
    let mut stack = ImageStack::new(2, 1);
    stack.add_slice(PlaneData::I16(vec![-32768, -1])).unwrap();
    stack.add_slice(PlaneData::I16(vec![0, 32767])).unwrap();
    let mut foreign = StackImage::new("signed", stack).unwrap();
    foreign.set_dimensions(2, 1, 1).unwrap();
    foreign.set_signed16(true);

    let native = convert_foreign_to_native(&mut foreign, None).unwrap();
    assert_eq!(native.data_xy(0, 0, 0), Some(&PlaneData::U16(vec![0, 32767])));
    assert_eq!(native.data_xy(0, 0, 1), Some(&PlaneData::U16(vec![32768, 65535])));
}

#[test]
fn test_signed16_export_round_trip() {
    let native = patterned_image(Dimensions::new(3, 3, 1, 2, 1), DataType::U16);
    let mut converter = Converter::new(ConversionOptions::new().with_signed16_output(true));
    let mut foreign = converter.native_to_foreign(&native).unwrap();
    assert!(foreign.is_signed16());
    assert_eq!(foreign.stack().data_type(), Some(DataType::I16));

    let back = converter.foreign_to_native(&mut foreign).unwrap();
    assert_eq!(back.data_xy(1, 0, 0), native.data_xy(1, 0, 0));
}

#[test]
fn test_signed16_export_skips_other_types() {
    let native = patterned_image(Dimensions::new(2, 2, 1, 1, 1), DataType::F32);
    let mut converter = Converter::new(ConversionOptions::new().with_signed16_output(true));
    let foreign = converter.native_to_foreign(&native).unwrap();
    assert!(!foreign.is_signed16());
}

#[test]
fn test_roi_positions_shift_by_one() {
    let positions = [
        RoiPosition::new(0, 0, 0),
        RoiPosition::new(3, 1, 7),
        RoiPosition::new(-1, 2, -1),
        RoiPosition::ANY,
    ];
    for position in positions {
        let native = Roi2D::rectangle(Rect::new(1.0, 1.0, 2.0, 2.0)).with_position(position);
        let foreign = native_roi_to_foreign(&native).unwrap();
        for (zero, one) in [
            (position.c, foreign.position.c),
            (position.z, foreign.position.z),
            (position.t, foreign.position.t),
        ] {
            assert_eq!(i64::from(zero) + 1, one as i64);
        }
        let back = foreign_roi_to_native(&foreign).unwrap();
        assert_eq!(back[0].position, position);
    }
}

#[test]
fn test_uncalibrated_native_writes_no_units() {
    let native = patterned_image(Dimensions::new(2, 2, 3, 2, 1), DataType::U8);
    assert_eq!(native.calibration(), &Calibration::default());
    let mut foreign = convert_native_to_foreign(&native, None).unwrap();
    assert!(foreign.calibration().explicit_unit().is_none());
    assert!(foreign.calibration().explicit_time_unit().is_none());

    let back = convert_foreign_to_native(&mut foreign, None).unwrap();
    assert_eq!(back.calibration(), &Calibration::default());
}

#[test]
fn test_calibration_round_trip_keeps_values() {
    let mut native = patterned_image(Dimensions::new(2, 2, 2, 2, 1), DataType::U8);
    native.set_calibration(
        Calibration::new()
            .with_pixel_size(0.2, 0.3, 1.5)
            .with_time_interval(250.0),
    );
    let mut foreign = convert_native_to_foreign(&native, None).unwrap();
    assert_eq!(foreign.calibration().explicit_time_unit(), Some("msec"));
    let back = convert_foreign_to_native(&mut foreign, None).unwrap();
    let cal = back.calibration();
    approx::assert_relative_eq!(cal.pixel_size_y, 0.3);
    approx::assert_relative_eq!(cal.time_interval, 250.0);
    assert_eq!(cal.spatial_unit.as_deref(), Some("mm"));
    assert_eq!(cal.time_unit.as_deref(), Some("msec"));
}

#[test]
fn test_composite_wrapping_by_channel_count() {
    for (size_c, composite) in [(1, false), (2, true), (4, true), (5, true), (7, true)] {
        let native = Image5D::new("c", Dimensions::new(2, 2, 1, 1, size_c), DataType::U8).unwrap();
        let foreign = convert_native_to_foreign(&native, None).unwrap();
        assert_eq!(foreign.is_composite(), composite, "size_c={size_c}");
        let expected = match size_c {
            1 => None,
            2..=4 => Some(imgbridge_stack::CompositeMode::Composite),
            _ => Some(imgbridge_stack::CompositeMode::Color),
        };
        assert_eq!(foreign.composite_mode(), expected);
    }
}

#[test]
fn test_rgb_plane_splits_into_three_channels() {
    let mut stack = ImageStack::new(2, 1);
    stack.add_slice(PlaneData::Rgb24(vec![0x0011_2233, 0x00FF_0080])).unwrap();
    let mut foreign = StackImage::new("rgb", stack).unwrap();
    assert_eq!(foreign.image_type(), ImageType::ColorRgb);

    let native = convert_foreign_to_native(&mut foreign, None).unwrap();
    assert_eq!(native.size_c(), 3);
    assert_eq!(native.data_type(), Some(DataType::U8));
    assert_eq!(native.data_xy(0, 0, 0), Some(&PlaneData::U8(vec![0x11, 0xFF])));
    assert_eq!(native.data_xy(0, 0, 1), Some(&PlaneData::U8(vec![0x22, 0x00])));
    assert_eq!(native.data_xy(0, 0, 2), Some(&PlaneData::U8(vec![0x33, 0x80])));
}

#[test]
fn test_indexed_plane_expands_through_lut() {
    let mut stack = ImageStack::new(3, 1);
    stack.add_slice(PlaneData::U8(vec![0, 1, 2])).unwrap();
    stack.add_slice(PlaneData::U8(vec![2, 2, 0])).unwrap();
    let mut foreign = StackImage::new("indexed", stack).unwrap();
    foreign.set_image_type(ImageType::Color256).unwrap();
    foreign.set_lut(Lut::new(vec![[0, 0, 0], [255, 0, 0], [0, 0, 255]]));

    let native = convert_foreign_to_native(&mut foreign, None).unwrap();
    assert_eq!(native.dimensions(), Dimensions::new(3, 1, 2, 1, 3));
    assert_eq!(native.data_xy(0, 0, 0), Some(&PlaneData::U8(vec![0, 255, 0])));
    assert_eq!(native.data_xy(0, 0, 2), Some(&PlaneData::U8(vec![0, 0, 255])));
    assert_eq!(native.data_xy(0, 1, 2), Some(&PlaneData::U8(vec![255, 255, 0])));
}

#[test]
fn test_conversion_into_existing_image_batches_events() {
    init_logging();
    let mut recipient = Image5D::new("old", Dimensions::new(8, 8, 1, 1, 1), DataType::F64).unwrap();
    let batches: Rc<RefCell<Vec<Vec<ImageEvent>>>> = Rc::default();
    let sink = Rc::clone(&batches);
    recipient.add_listener(move |events: &[ImageEvent]| sink.borrow_mut().push(events.to_vec()));

    let mut stack = ImageStack::new(2, 2);
    stack.add_slice(PlaneData::U8(vec![1, 2, 3, 4])).unwrap();
    stack.add_slice(PlaneData::U8(vec![5, 6, 7, 8])).unwrap();
    let mut foreign = StackImage::new("new", stack).unwrap();
    foreign.set_roi(ForeignRoi::oval(Rect::new(0.0, 0.0, 1.0, 1.0)));

    Converter::default()
        .foreign_to_native_into(&mut foreign, &mut recipient)
        .unwrap();

    assert_eq!(recipient.name(), "new");
    assert_eq!(recipient.dimensions(), Dimensions::new(2, 2, 2, 1, 1));
    assert_eq!(recipient.rois().len(), 1);
    let batches = batches.borrow();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].first(), Some(&ImageEvent::Cleared));
    assert!(batches[0].contains(&ImageEvent::PlaneChanged { t: 0, z: 1 }));
    assert!(batches[0].contains(&ImageEvent::RoiAdded { index: 0 }));
    assert_eq!(batches[0].last(), Some(&ImageEvent::CalibrationChanged));
}

#[test]
fn test_shape_mismatch_rolls_back() {
    /// Declares a 3x3 image but serves 2x2 planes.
    struct Lying(StackImage);

    impl ForeignImage for Lying {
        fn title(&self) -> &str {
            "lying"
        }
        fn dimensions(&self) -> Dimensions {
            Dimensions::new(3, 3, 1, 1, 1)
        }
        fn image_type(&self) -> ImageType {
            self.0.image_type()
        }
        fn is_signed16(&self) -> bool {
            false
        }
        fn set_position(&mut self, c: usize, z: usize, t: usize) -> imgbridge_stack::Result<()> {
            self.0.set_position(c, z, t)
        }
        fn pixels(&self) -> imgbridge_stack::Result<&PlaneData> {
            self.0.pixels()
        }
        fn roi(&self) -> Option<&ForeignRoi> {
            None
        }
        fn calibration(&self) -> &imgbridge_stack::StackCalibration {
            self.0.calibration()
        }
    }

    let mut stack = ImageStack::new(2, 2);
    stack.add_slice(PlaneData::U8(vec![0; 4])).unwrap();
    let mut lying = Lying(StackImage::new("inner", stack).unwrap());
    let mut recipient = Image5D::empty("untouched");
    let err = Converter::default()
        .foreign_to_native_into(&mut lying, &mut recipient)
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch(_)));
    assert!(!err.is_recoverable());
    assert_eq!(recipient.name(), "untouched");
    assert!(recipient.is_empty());
}

#[test]
fn test_malformed_roi_is_replaced_and_reported() {
    init_logging();
    let mut stack = ImageStack::new(4, 4);
    stack.add_slice(PlaneData::U8(vec![0; 16])).unwrap();
    let mut foreign = StackImage::new("bad roi", stack).unwrap();
    foreign.set_roi(
        ForeignRoi::polygon(PolygonKind::Polygon, Vec::new())
            .with_position(StackPosition::new(1, 1, 1))
            .with_stroke_color(Color::RED),
    );

    let mut reported = Vec::new();
    let mut listener = |err: &Error| reported.push(err.clone());
    let native = Converter::default()
        .with_diagnostics(&mut listener)
        .foreign_to_native(&mut foreign)
        .unwrap();

    assert_eq!(native.rois().len(), 1);
    assert_eq!(native.rois()[0].shape.kind_name(), "rectangle");
    assert_eq!(native.rois()[0].color, Color::RED);
    assert_eq!(reported.len(), 1);
    assert!(matches!(reported[0], Error::MalformedRoi(_)));
}

#[test]
fn test_first_native_roi_is_attached() {
    let mut native = Image5D::new("rois", Dimensions::new(4, 4, 1, 1, 1), DataType::U8).unwrap();
    native.add_roi(Roi2D::line(Point2::new(0.0, 3.0), Point2::new(3.0, 0.0)).with_name("first"));
    native.add_roi(Roi2D::point(Point2::new(1.0, 1.0)));

    let foreign = convert_native_to_foreign(&native, None).unwrap();
    let roi = foreign.roi().unwrap();
    assert_eq!(roi.name.as_deref(), Some("first"));
    assert_eq!(
        roi.line_endpoints(),
        Some((Point2::new(0.0, 3.0), Point2::new(3.0, 0.0)))
    );
    assert!(foreign.overlay().is_empty());
}

#[test]
fn test_overlay_transport_both_directions() {
    let mut native = Image5D::new("overlay", Dimensions::new(4, 4, 1, 1, 1), DataType::U8).unwrap();
    native.add_roi(Roi2D::rectangle(Rect::new(0.0, 0.0, 2.0, 2.0)));
    native.add_roi(Roi2D::polyline(vec![Point2::new(0.0, 0.0), Point2::new(3.0, 1.0)]));
    native.add_roi(Roi2D::point(Point2::new(2.0, 2.0)));

    let mut converter = Converter::new(ConversionOptions::new().with_overlay(true));
    let mut foreign = converter.native_to_foreign(&native).unwrap();
    assert_eq!(foreign.overlay().len(), 3);
    assert!(foreign.roi().is_some());

    foreign.kill_roi();
    let back = converter.foreign_to_native(&mut foreign).unwrap();
    let kinds: Vec<&str> = back.rois().iter().map(|r| r.shape.kind_name()).collect();
    assert_eq!(kinds, vec!["rectangle", "polyline", "point"]);

    let without = convert_foreign_to_native(&mut foreign, None).unwrap();
    assert!(without.rois().is_empty());
}

#[test]
fn test_area_roi_exports_as_image_roi() {
    let mut native = Image5D::new("mask", Dimensions::new(4, 4, 1, 1, 1), DataType::U8).unwrap();
    let mask = imgbridge_core::AreaMask::new(1, 1, 2, 2, vec![true, false, true, true])
        .unwrap()
        .with_opacity(0.5);
    native.add_roi(Roi2D::new(RoiShape::Area(mask)));

    let mut foreign = convert_native_to_foreign(&native, None).unwrap();
    assert_eq!(foreign.roi().map(ForeignRoi::roi_type), Some(imgbridge_stack::RoiType::Rectangle));

    let back = convert_foreign_to_native(&mut foreign, None).unwrap();
    assert_eq!(back.rois()[0].shape, RoiShape::Rectangle(Rect::new(1.0, 1.0, 2.0, 2.0)));
}

#[test]
fn test_incomplete_native_image_is_rejected() {
    let mut native = Image5D::empty("gap");
    native
        .set_plane(0, 1, ImagePlane::zeros(2, 2, 1, DataType::U8).unwrap())
        .unwrap();
    let err = convert_native_to_foreign(&native, None).unwrap_err();
    assert!(matches!(err, Error::Internal(_)));

    assert!(convert_native_to_foreign(&Image5D::empty("none"), None).is_err());
}

#[cfg(feature = "serde")]
#[test]
fn test_options_serde_round_trip() {
    let options = ConversionOptions::new()
        .with_spatial_unit("um")
        .with_overlay(true);
    let json = serde_json::to_string(&options).unwrap();
    let back: ConversionOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);

    let partial: ConversionOptions = serde_json::from_str(r#"{"signed16_output":true}"#).unwrap();
    assert!(partial.signed16_output);
    assert_eq!(partial.time_unit, "msec");
}
