//! Measurement units and display formatting.
//!
//! The document engine always emits millimeter G-code (G21); the unit
//! types here exist for settings display and for the units setup line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        Self::Metric
    }
}

impl MeasurementSystem {
    /// The G-code units setup line for this system.
    pub fn setup_line(&self) -> &'static str {
        match self {
            Self::Metric => "G21  (Units = millimeters)",
            Self::Imperial => "G20  (Units = inches)",
        }
    }

    /// Unit label ("mm" or "in").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a length value for display in the given system.
///
/// * `value_mm` - Value in millimeters
pub fn format_length(value_mm: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.3}", value_mm),
        MeasurementSystem::Imperial => format!("{:.3}", value_mm / 25.4),
    }
}

/// Format a feed rate (mm/min) for display in the given system.
pub fn format_feed(value_mm_per_min: f64, system: MeasurementSystem) -> String {
    match system {
        MeasurementSystem::Metric => format!("{:.1} mm/min", value_mm_per_min),
        MeasurementSystem::Imperial => format!("{:.1} in/min", value_mm_per_min / 25.4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_lines() {
        assert_eq!(
            MeasurementSystem::Metric.setup_line(),
            "G21  (Units = millimeters)"
        );
        assert_eq!(
            MeasurementSystem::Imperial.setup_line(),
            "G20  (Units = inches)"
        );
    }

    #[test]
    fn test_metric_formatting() {
        assert_eq!(format_length(10.5, MeasurementSystem::Metric), "10.500");
        assert_eq!(
            format_feed(1000.0, MeasurementSystem::Metric),
            "1000.0 mm/min"
        );
    }

    #[test]
    fn test_imperial_formatting() {
        assert_eq!(format_length(25.4, MeasurementSystem::Imperial), "1.000");
        assert_eq!(
            format_feed(254.0, MeasurementSystem::Imperial),
            "10.0 in/min"
        );
    }

    #[test]
    fn test_parsing() {
        assert_eq!(
            "mm".parse::<MeasurementSystem>().unwrap(),
            MeasurementSystem::Metric
        );
        assert_eq!(
            "Imperial".parse::<MeasurementSystem>().unwrap(),
            MeasurementSystem::Imperial
        );
        assert!("furlong".parse::<MeasurementSystem>().is_err());
    }
}
