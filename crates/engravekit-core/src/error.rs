//! Error types for core settings handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating or persisting machine settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A settings value failed validation.
    #[error("Invalid setting '{name}': {reason}")]
    Invalid {
        /// The offending setting name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Settings file could not be read or written.
    #[error("Settings I/O failed for {path}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Settings file was not valid JSON.
    #[error("Settings parse failed for {path}")]
    Parse {
        /// The file involved.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
