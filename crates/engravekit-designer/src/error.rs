//! Error types for the document and shape engine.

use std::io;
use thiserror::Error;

/// Errors raised while building shapes, composing layouts, or generating
/// G-code from a document.
#[derive(Error, Debug)]
pub enum DesignError {
    /// A dimension that must be strictly positive was not.
    #[error("Invalid {name}: must be positive, got {value}")]
    InvalidDimension {
        /// Which dimension was rejected.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// Laser power must be a percentage on [0, 100].
    #[error("Invalid laser power: must be on range [0,100], got {value}")]
    InvalidPower {
        /// The offending value.
        value: f64,
    },

    /// Feed rates must be strictly positive.
    #[error("Invalid feed rate: must be positive, got {value}")]
    InvalidFeed {
        /// The offending value.
        value: f64,
    },

    /// Fill stepover must be strictly positive.
    #[error("Invalid fill stepover: must be positive, got {value}")]
    InvalidStepover {
        /// The offending value.
        value: f64,
    },

    /// Cutting pass count must be at least one.
    #[error("Invalid pass count: must be at least 1, got {value}")]
    InvalidPasses {
        /// The offending value.
        value: u32,
    },

    /// A laser on/off override did not parse as a known G-code word.
    #[error("{reason}")]
    InvalidLaserCode {
        /// The parse failure message.
        reason: String,
    },

    /// Attempt to clear a fill flag that was already set.
    #[error("A shape fill cannot be removed once requested")]
    CannotUnfill,

    /// This shape kind has no fill routine.
    #[error("Fill is not supported for shape: {shape}")]
    FillUnsupported {
        /// The shape kind.
        shape: &'static str,
    },

    /// This layout kind cannot report an overall size.
    #[error("Size is not defined for layout: {layout}")]
    SizeUnsupported {
        /// The layout kind.
        layout: &'static str,
    },

    /// Text contained a character with no engraving strokes defined.
    #[error("No engraving strokes defined for character: {ch:?}")]
    UnsupportedCharacter {
        /// The character.
        ch: char,
    },

    /// A point-list shape was built with too few points.
    #[error("{shape} requires at least {needed} points, got {got}")]
    TooFewPoints {
        /// The shape kind.
        shape: &'static str,
        /// Minimum point count.
        needed: usize,
        /// Points actually supplied.
        got: usize,
    },

    /// A shape produced no toolpath points at emission time.
    #[error("Shape has no points to emit: {shape}")]
    EmptyShape {
        /// The shape kind.
        shape: &'static str,
    },

    /// Grid cell coordinates were outside the grid.
    #[error("Grid cell ({row},{column}) is outside a {rows}x{columns} grid")]
    GridIndex {
        /// Requested row.
        row: usize,
        /// Requested column.
        column: usize,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        columns: usize,
    },

    /// Grid dimensions must be at least 1x1.
    #[error("Invalid grid: {reason}")]
    InvalidGrid {
        /// Why the grid was rejected.
        reason: String,
    },

    /// A calibration document was configured with no test values.
    #[error("Calibration input '{name}' must not be empty")]
    EmptyCalibration {
        /// Which input list was empty.
        name: &'static str,
    },

    /// Writing the generated G-code failed.
    #[error("Failed to write G-code output")]
    Io(#[from] io::Error),
}
