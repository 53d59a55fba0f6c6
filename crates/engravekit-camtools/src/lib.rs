//! # EngraveKit CAM Tools
//!
//! The boundary between parsed PCB geometry and the document engine.
//! Gerber and Excellon parsing live upstream; this crate turns their
//! typed primitive records into [`engravekit_designer::Document`]s
//! ready for G-code generation.

pub mod error;
pub mod gerber;

pub use error::CamError;
pub use gerber::{document_from_primitives, GerberPrimitive, Polarity};
