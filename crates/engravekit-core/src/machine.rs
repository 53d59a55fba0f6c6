//! Laser operating modes and machine-level settings.

use crate::error::SettingsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Laser power mode for the "laser on" command.
///
/// GRBL-style controllers distinguish constant power (M3) from power that
/// is scaled down while the machine accelerates (M4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaserMode {
    /// M3: constant laser power regardless of speed.
    ConstantPower,
    /// M4: laser power compensated for actual travel speed.
    DynamicPower,
}

impl LaserMode {
    /// The G-code word for this mode.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConstantPower => "M3",
            Self::DynamicPower => "M4",
        }
    }
}

impl Default for LaserMode {
    fn default() -> Self {
        Self::DynamicPower
    }
}

impl fmt::Display for LaserMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for LaserMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M3" => Ok(Self::ConstantPower),
            "M4" => Ok(Self::DynamicPower),
            other => Err(format!(
                "Laser on G-code must be either M3 or M4, not: {}",
                other
            )),
        }
    }
}

/// Device-level configuration for a laser engraver.
///
/// Values are millimeters and mm/min throughout. `device_power_max` is the
/// raw S-word value the controller treats as 100% power (1000 for the
/// stock GRBL configuration).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Laser on mode (M3/M4).
    pub laser_mode: LaserMode,
    /// Maximum S-word value understood by the device.
    pub device_power_max: f64,
    /// Default laser power as a percentage of device maximum, [0, 100].
    pub laser_power_default: f64,
    /// Feed used for non-cutting positioning moves.
    pub travel_feed: f64,
    /// Default cutting feed for shapes without an override.
    pub cut_feed: f64,
    /// Z height for retraction before positioning moves, if enabled.
    pub z_retract_height: Option<f64>,
    /// Spacing between adjacent fill passes.
    pub fill_stepover: f64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            laser_mode: LaserMode::DynamicPower,
            device_power_max: 1000.0,
            laser_power_default: 80.0,
            travel_feed: 3000.0,
            cut_feed: 500.0,
            z_retract_height: None,
            fill_stepover: 0.1,
        }
    }
}

impl MachineSettings {
    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn positive(name: &'static str, value: f64) -> Result<(), SettingsError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    name,
                    reason: format!("must be positive, got {}", value),
                })
            }
        }

        positive("device_power_max", self.device_power_max)?;
        positive("travel_feed", self.travel_feed)?;
        positive("cut_feed", self.cut_feed)?;
        positive("fill_stepover", self.fill_stepover)?;
        if !(0.0..=100.0).contains(&self.laser_power_default) {
            return Err(SettingsError::Invalid {
                name: "laser_power_default",
                reason: format!("must be on range [0,100], got {}", self.laser_power_default),
            });
        }
        Ok(())
    }

    /// Loads and validates settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        debug!(path = %path.display(), "loaded machine settings");
        Ok(settings)
    }

    /// Writes settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, text).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
