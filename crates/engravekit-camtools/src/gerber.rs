//! Conversion from parsed Gerber geometry to an engraving document.
//!
//! Gerber parsing itself happens upstream; this module consumes a flat
//! sequence of typed primitive records. Only the geometry a laser can
//! reproduce directly is accepted: rectangular pads, and zero-length
//! round-aperture draws which are really just dots. Anything else stops
//! the conversion so copper is never silently dropped from the board.

use crate::error::CamError;
use engravekit_designer::{Circle, Document, Layout, Rectangle, Shape};
use tracing::{debug, info};

/// Layer polarity of a primitive.
///
/// Both polarities engrave identically today; the tag is carried so
/// clear-layer handling can diverge without changing the record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Dark,
    Clear,
}

/// A parsed Gerber primitive record.
///
/// Coordinates are board millimeters. Rectangles are addressed by their
/// center, matching the aperture flash convention.
#[derive(Debug, Clone)]
pub enum GerberPrimitive {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
        polarity: Polarity,
    },
    /// A stroked segment. Zero-length draws are dots and convert to
    /// circles of half the stroke width.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        polarity: Polarity,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        polarity: Polarity,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        polarity: Polarity,
    },
    Polygon {
        x: f64,
        y: f64,
        polarity: Polarity,
    },
}

const ZERO_LENGTH: f64 = 1e-9;

/// Converts primitive records into a document with a travel-optimizing
/// layout. Fails on the first primitive that cannot be engraved.
pub fn document_from_primitives(
    primitives: &[GerberPrimitive],
) -> Result<Document, CamError> {
    let mut doc = Document::new();
    doc.set_layout(Layout::nearest_neighbor());

    let mut pads = 0usize;
    let mut dots = 0usize;
    for primitive in primitives {
        debug!(?primitive, "converting primitive");
        match primitive {
            GerberPrimitive::Rectangle {
                x,
                y,
                width,
                height,
                rotation,
                ..
            } => {
                let mut pad = Rectangle::new(*x, *y, 0.0, *width, *height)?;
                pad.set_rotation(*rotation);
                doc.add_shape(Shape::Rectangle(pad))?;
                pads += 1;
            }
            GerberPrimitive::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                ..
            } => {
                let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
                if length > ZERO_LENGTH {
                    return Err(CamError::UnsupportedPrimitive {
                        kind: "stroked line",
                        x: *x1,
                        y: *y1,
                    });
                }
                let dot = Circle::new(*x1, *y1, 0.0, width / 2.0)?;
                doc.add_shape(Shape::Circle(dot))?;
                dots += 1;
            }
            GerberPrimitive::Circle { x, y, .. } => {
                return Err(CamError::UnsupportedPrimitive {
                    kind: "circle aperture",
                    x: *x,
                    y: *y,
                });
            }
            GerberPrimitive::Arc { x, y, .. } => {
                return Err(CamError::UnsupportedPrimitive {
                    kind: "arc",
                    x: *x,
                    y: *y,
                });
            }
            GerberPrimitive::Polygon { x, y, .. } => {
                return Err(CamError::UnsupportedPrimitive {
                    kind: "polygon",
                    x: *x,
                    y: *y,
                });
            }
        }
    }

    info!(pads, dots, "converted Gerber primitives");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(x: f64, y: f64) -> GerberPrimitive {
        GerberPrimitive::Rectangle {
            x,
            y,
            width: 2.0,
            height: 1.0,
            rotation: 0.0,
            polarity: Polarity::Dark,
        }
    }

    #[test]
    fn test_rectangle_pads_convert() {
        let mut doc = document_from_primitives(&[pad(5.0, 5.0), pad(20.0, 5.0)]).unwrap();
        let code = doc.generate().unwrap();
        assert_eq!(code.matches("(Rectangle:").count(), 2);
    }

    #[test]
    fn test_zero_length_draw_becomes_dot() {
        let dot = GerberPrimitive::Line {
            x1: 3.0,
            y1: 4.0,
            x2: 3.0,
            y2: 4.0,
            width: 1.0,
            polarity: Polarity::Dark,
        };
        let mut doc = document_from_primitives(&[dot]).unwrap();
        let code = doc.generate().unwrap();
        assert!(code.contains("Circle: x=3.000,y=4.000,radius=0.500"));
    }

    #[test]
    fn test_stroked_line_is_rejected() {
        let trace = GerberPrimitive::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 0.0,
            width: 0.3,
            polarity: Polarity::Dark,
        };
        assert!(matches!(
            document_from_primitives(&[trace]),
            Err(CamError::UnsupportedPrimitive {
                kind: "stroked line",
                ..
            })
        ));
    }

    #[test]
    fn test_arc_and_polygon_are_rejected() {
        let arc = GerberPrimitive::Arc {
            x: 1.0,
            y: 2.0,
            radius: 3.0,
            polarity: Polarity::Dark,
        };
        assert!(matches!(
            document_from_primitives(&[arc]),
            Err(CamError::UnsupportedPrimitive { kind: "arc", .. })
        ));

        let poly = GerberPrimitive::Polygon {
            x: 0.0,
            y: 0.0,
            polarity: Polarity::Clear,
        };
        assert!(matches!(
            document_from_primitives(&[poly]),
            Err(CamError::UnsupportedPrimitive { kind: "polygon", .. })
        ));
    }

    #[test]
    fn test_polarity_does_not_change_geometry() {
        let rect = |polarity| GerberPrimitive::Rectangle {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 2.0,
            rotation: 0.0,
            polarity,
        };
        let dark = rect(Polarity::Dark);
        let clear = rect(Polarity::Clear);
        let mut a = document_from_primitives(&[dark]).unwrap();
        let mut b = document_from_primitives(&[clear]).unwrap();
        assert_eq!(a.generate().unwrap(), b.generate().unwrap());
    }
}
