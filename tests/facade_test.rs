//! Smoke tests for the top-level facade.

use engravekit::{
    document_from_primitives, Document, GerberPrimitive, Layout, Polarity, Rectangle, Shape,
    SpeedPowerTest,
};

#[test]
fn test_document_flow_through_facade() {
    let mut doc = Document::new();
    doc.set_layout(Layout::nearest_neighbor());
    doc.add_shape(Shape::Rectangle(
        Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap(),
    ))
    .unwrap();
    let code = doc.generate().unwrap();
    assert!(code.contains("M4"));
    assert!(code.contains("M2 (End Document)"));
}

#[test]
fn test_calibration_saves_through_facade() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("speed-power.gcode");
    let mut doc = SpeedPowerTest::new(vec![500.0], vec![50.0])
        .unwrap()
        .build()
        .unwrap();
    doc.save(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_gerber_conversion_through_facade() {
    let pad = GerberPrimitive::Rectangle {
        x: 1.0,
        y: 2.0,
        width: 1.5,
        height: 1.0,
        rotation: 0.0,
        polarity: Polarity::Dark,
    };
    let mut doc = document_from_primitives(&[pad]).unwrap();
    assert!(doc.generate().unwrap().contains("(Rectangle:"));
}
