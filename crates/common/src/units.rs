//! Unit conversion at the configuration and display boundaries.
//!
//! Internally everything is SI; these helpers are the only place imperial
//! quantities appear.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const FEET_TO_METERS: f64 = 0.3048;
pub const POUNDS_TO_KILOGRAMS: f64 = 0.453_592_37;
pub const POUND_FORCE_TO_NEWTONS: f64 = 4.448_221_615;
pub const HORSEPOWER_TO_WATTS: f64 = 745.699_872;
pub const MPH_TO_MPS: f64 = 0.447_04;
pub const KNOTS_TO_MPS: f64 = 0.514_444;
pub const KMH_TO_MPS: f64 = 1.0 / 3.6;

/// Unit system a configuration document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    /// Length (ft or m) to meters.
    pub fn length(self, v: f64) -> f64 {
        match self {
            Self::Metric => v,
            Self::Imperial => v * FEET_TO_METERS,
        }
    }

    /// Area (ft² or m²) to m².
    pub fn area(self, v: f64) -> f64 {
        match self {
            Self::Metric => v,
            Self::Imperial => v * FEET_TO_METERS * FEET_TO_METERS,
        }
    }

    /// Mass (lb or kg) to kilograms.
    pub fn mass(self, v: f64) -> f64 {
        match self {
            Self::Metric => v,
            Self::Imperial => v * POUNDS_TO_KILOGRAMS,
        }
    }

    /// Force (lbf or N) to newtons.
    pub fn force(self, v: f64) -> f64 {
        match self {
            Self::Metric => v,
            Self::Imperial => v * POUND_FORCE_TO_NEWTONS,
        }
    }

    /// Power (hp or kW) to watts.
    pub fn power(self, v: f64) -> f64 {
        match self {
            Self::Metric => v * 1000.0,
            Self::Imperial => v * HORSEPOWER_TO_WATTS,
        }
    }

    /// Speed (mph or km/h) to m/s.
    pub fn speed(self, v: f64) -> f64 {
        match self {
            Self::Metric => v * KMH_TO_MPS,
            Self::Imperial => v * MPH_TO_MPS,
        }
    }
}

/// Units the HUD reports speed and altitude in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayUnits {
    #[default]
    Mph,
    Knots,
    Kmh,
}

impl DisplayUnits {
    /// Convert m/s to the display speed unit.
    pub fn speed(self, mps: f64) -> f64 {
        match self {
            Self::Mph => mps / MPH_TO_MPS,
            Self::Knots => mps / KNOTS_TO_MPS,
            Self::Kmh => mps / KMH_TO_MPS,
        }
    }

    /// Convert meters to the display altitude unit (feet unless metric).
    pub fn altitude(self, meters: f64) -> f64 {
        match self {
            Self::Kmh => meters,
            Self::Mph | Self::Knots => meters / FEET_TO_METERS,
        }
    }

    pub fn speed_label(self) -> &'static str {
        match self {
            Self::Mph => "mph",
            Self::Knots => "kts",
            Self::Kmh => "km/h",
        }
    }

    pub fn altitude_label(self) -> &'static str {
        match self {
            Self::Kmh => "m",
            Self::Mph | Self::Knots => "ft",
        }
    }
}

impl fmt::Display for DisplayUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.speed_label())
    }
}
