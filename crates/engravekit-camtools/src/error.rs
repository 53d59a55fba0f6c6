//! Error types for the CAM conversion boundary.

use engravekit_designer::DesignError;
use thiserror::Error;

/// Errors raised while converting parsed PCB geometry into a document.
#[derive(Error, Debug)]
pub enum CamError {
    /// The geometry source produced a primitive this toolchain cannot
    /// engrave. Conversion stops rather than silently dropping copper.
    #[error("Unsupported Gerber primitive: {kind} at ({x:.3}, {y:.3})")]
    UnsupportedPrimitive {
        /// Primitive kind name.
        kind: &'static str,
        /// Approximate location in board coordinates.
        x: f64,
        y: f64,
    },

    /// A primitive converted into an invalid shape.
    #[error(transparent)]
    Design(#[from] DesignError),
}
