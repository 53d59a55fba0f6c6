//! # EngraveKit Designer
//!
//! The G-code document engine: vector shapes, composable layout
//! strategies, and document generation for GRBL-style laser engravers.
//!
//! A [`Document`] owns machine state and a tree of shapes arranged by a
//! [`Layout`]. Shapes emit themselves through a fixed protocol (travel,
//! plunge, laser on, cut, laser off) so every generated job reads the
//! same way. The [`calibration`] module builds ready-to-cut tuning
//! documents on top of the same machinery.
//!
//! ```
//! use engravekit_designer::{Document, Layout, Rectangle, Shape};
//!
//! let mut doc = Document::new();
//! doc.set_layout(Layout::nearest_neighbor());
//! doc.add_shape(Shape::Rectangle(
//!     Rectangle::new(0.0, 0.0, 0.0, 10.0, 10.0).unwrap(),
//! ))
//! .unwrap();
//! let code = doc.generate().unwrap();
//! assert!(code.contains("M4"));
//! ```

pub mod calibration;
pub mod document;
pub mod error;
pub mod glyphs;
pub mod layout;
pub mod shapes;

pub use calibration::{guide_line, FocusTest, SpeedPowerTest};
pub use document::{CodeBuffer, Document, EmitContext, MachineState};
pub use error::DesignError;
pub use layout::{CellLayout, Frame, GridLayout, Layout, Node};
pub use shapes::{
    rotate_point, Circle, CutStyle, Line, Point, PolyLine, Polygon, Rectangle, Shape, Text,
};
