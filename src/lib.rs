//! # EngraveKit
//!
//! A G-code generation toolchain for GRBL-style laser engravers:
//! - Vector shapes, composable layouts, and document generation
//! - Ready-made calibration documents (speed/power grid, focus ramp)
//! - A CAM boundary turning parsed Gerber primitives into documents
//!
//! ## Architecture
//!
//! EngraveKit is organized as a workspace with multiple crates:
//!
//! 1. **engravekit-core** - Units, laser modes, machine settings
//! 2. **engravekit-designer** - Shapes, layouts, documents, calibration
//! 3. **engravekit-camtools** - Gerber primitive conversion
//! 4. **engravekit** - Main binary that integrates all crates

pub use engravekit_camtools as camtools;
pub use engravekit_designer as designer;

pub use engravekit_core::{
    format_feed, format_length, LaserMode, MachineSettings, MeasurementSystem, SettingsError,
};

pub use engravekit_designer::{
    guide_line, Circle, CutStyle, DesignError, Document, FocusTest, GridLayout, Layout, Line,
    Node, Point, PolyLine, Polygon, Rectangle, Shape, SpeedPowerTest, Text,
};

pub use engravekit_camtools::{document_from_primitives, CamError, GerberPrimitive, Polarity};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
