//! # EngraveKit Core
//!
//! Core types shared across the EngraveKit crates:
//! - Measurement units and formatting helpers
//! - Laser operating modes and machine settings
//! - Settings persistence errors
//!
//! Higher layers (the designer document engine, the CAM boundary crate)
//! build on these without pulling in each other.

pub mod error;
pub mod machine;
pub mod units;

pub use error::SettingsError;
pub use machine::{LaserMode, MachineSettings};
pub use units::{format_feed, format_length, MeasurementSystem};
