use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::config::ConfigError;
use crate::state::Equipment;

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.806_65;

/// Read-only description of one aircraft type, in SI units.
///
/// Built once at startup by [`crate::config`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftSpec {
    pub name: String,
    /// Mass (kg). Must be positive.
    pub mass: f64,
    pub wing: WingSpec,
    pub propulsion: PropulsionSpec,
    pub drag: DragSpec,
    pub taildragger: TaildraggerSpec,
    pub attitude: AttitudeLimits,
    /// Clearance (m) between ground elevation and the aircraft reference point
    /// when sitting on its wheels.
    pub min_agl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WingSpec {
    pub span: f64,
    pub area: f64,
    /// Oswald span efficiency.
    pub efficiency: f64,
    pub max_lift_coefficient: f64,
}

impl WingSpec {
    pub fn aspect_ratio(&self) -> f64 {
        self.span * self.span / self.area
    }

    /// Lift coefficient needed to hold `weight` at dynamic pressure `q`,
    /// limited to `[0, max_lift_coefficient]`.
    pub fn level_flight_lift_coefficient(&self, weight: f64, q: f64) -> f64 {
        if q <= f64::EPSILON {
            return self.max_lift_coefficient;
        }
        (weight / (q * self.area)).clamp(0.0, self.max_lift_coefficient)
    }

    /// Induced drag coefficient for the given lift coefficient.
    pub fn induced_drag_coefficient(&self, lift_coefficient: f64) -> f64 {
        lift_coefficient * lift_coefficient / (PI * self.aspect_ratio() * self.efficiency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropulsionSpec {
    /// Static thrust ceiling (N).
    pub max_thrust: f64,
    /// Shaft power (W).
    pub max_power: f64,
    pub propeller_efficiency: f64,
}

impl PropulsionSpec {
    /// Thrust available at full throttle and the given airspeed: the static
    /// ceiling, limited by propeller power once moving.
    pub fn available_thrust(&self, speed: f64) -> f64 {
        let power_limited = self.propeller_efficiency * self.max_power / speed.abs().max(1.0);
        self.max_thrust.min(power_limited)
    }
}

/// Parasitic drag: a base coefficient over the frontal area plus increments
/// for deployed equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSpec {
    pub frontal_area: f64,
    pub parasitic: f64,
    #[serde(default)]
    pub flaps: f64,
    #[serde(default)]
    pub gear: f64,
    #[serde(default)]
    pub spoiler: f64,
    #[serde(default)]
    pub airbrake: f64,
}

impl DragSpec {
    /// Total parasitic coefficient for the current equipment deployment.
    /// The brake lever drives both spoiler and airbrake.
    pub fn parasitic_coefficient(&self, equipment: &Equipment) -> f64 {
        self.parasitic
            + equipment.flaps * self.flaps
            + equipment.gear * self.gear
            + equipment.brake * (self.spoiler + self.airbrake)
    }
}

/// Main-gear-forward, tail-wheel-aft landing gear geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaildraggerSpec {
    /// Distance from main axle to center of gravity (m).
    pub axle_to_cg: f64,
    /// Elevation of the axle-to-CG line above horizontal, wings level (deg).
    pub axle_angle: f64,
    pub wheel_radius: f64,
    /// Nose-up attitude when resting on all three wheels (deg).
    pub max_tail_angle: f64,
    /// Ground speed at which the tail is fully up (m/s).
    pub tail_lift_speed: f64,
}

/// Per-type attitude and rate limits applied by the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttitudeLimits {
    /// Pitch is clamped to ±this (deg).
    pub pitch_limit: f64,
    /// Bank stays within ±this of wings-level (deg).
    pub bank_limit: f64,
    /// Roll rate available to the control mapper (deg/s).
    pub max_bank_rate: f64,
    /// Vertical speed accumulator clamp (m/s).
    pub max_vertical_speed: f64,
}

impl Default for AttitudeLimits {
    fn default() -> Self {
        Self {
            pitch_limit: 15.0,
            bank_limit: 30.0,
            max_bank_rate: 90.0,
            max_vertical_speed: 0.5,
        }
    }
}

impl AircraftSpec {
    /// Weight force (N).
    pub fn weight(&self) -> f64 {
        self.mass * GRAVITY
    }

    /// Check every precondition the integrator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("mass", self.mass)?;
        positive("wing.span", self.wing.span)?;
        positive("wing.area", self.wing.area)?;
        in_range("wing.efficiency", self.wing.efficiency, f64::EPSILON, 1.0)?;
        positive("wing.max_lift_coefficient", self.wing.max_lift_coefficient)?;
        positive("propulsion.max_thrust", self.propulsion.max_thrust)?;
        positive("propulsion.max_power", self.propulsion.max_power)?;
        in_range(
            "propulsion.propeller_efficiency",
            self.propulsion.propeller_efficiency,
            f64::EPSILON,
            1.0,
        )?;
        positive("drag.frontal_area", self.drag.frontal_area)?;
        non_negative("drag.parasitic", self.drag.parasitic)?;
        non_negative("drag.flaps", self.drag.flaps)?;
        non_negative("drag.gear", self.drag.gear)?;
        non_negative("drag.spoiler", self.drag.spoiler)?;
        non_negative("drag.airbrake", self.drag.airbrake)?;
        non_negative("taildragger.axle_to_cg", self.taildragger.axle_to_cg)?;
        positive("taildragger.wheel_radius", self.taildragger.wheel_radius)?;
        in_range("taildragger.max_tail_angle", self.taildragger.max_tail_angle, 0.0, 45.0)?;
        positive("taildragger.tail_lift_speed", self.taildragger.tail_lift_speed)?;
        in_range("attitude.pitch_limit", self.attitude.pitch_limit, f64::EPSILON, 90.0)?;
        in_range("attitude.bank_limit", self.attitude.bank_limit, f64::EPSILON, 179.0)?;
        positive("attitude.max_bank_rate", self.attitude.max_bank_rate)?;
        positive("attitude.max_vertical_speed", self.attitude.max_vertical_speed)?;
        non_negative("min_agl", self.min_agl)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    in_range(field, value, 0.0, f64::MAX)
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    #[test]
    fn presets_validate() {
        for preset in Preset::ALL {
            let spec = preset.load().unwrap();
            spec.validate().unwrap();
        }
    }

    #[test]
    fn zero_mass_rejected() {
        let mut spec = Preset::CarrierFighter.load().unwrap();
        spec.mass = 0.0;
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::NonPositive { field: "mass", .. })
        ));
    }

    #[test]
    fn efficiency_above_one_rejected() {
        let mut spec = Preset::CarrierFighter.load().unwrap();
        spec.propulsion.propeller_efficiency = 1.2;
        assert!(matches!(
            spec.validate(),
            Err(ConfigError::OutOfRange { field: "propulsion.propeller_efficiency", .. })
        ));
    }

    #[test]
    fn power_caps_thrust_at_speed() {
        let p = PropulsionSpec {
            max_thrust: 13_762.0,
            max_power: 1_500_000.0,
            propeller_efficiency: 0.8,
        };
        assert_eq!(p.available_thrust(0.0), 13_762.0);
        assert!((p.available_thrust(150.0) - 8_000.0).abs() < 1e-9);
    }

    #[test]
    fn equipment_adds_drag() {
        let drag = DragSpec {
            frontal_area: 2.0,
            parasitic: 0.2,
            flaps: 0.08,
            gear: 0.05,
            spoiler: 0.04,
            airbrake: 0.12,
        };
        let clean = Equipment::default();
        assert!((drag.parasitic_coefficient(&clean) - 0.2).abs() < 1e-12);
        let dirty = Equipment {
            throttle: 0.0,
            flaps: 1.0,
            gear: 1.0,
            brake: 0.5,
        };
        assert!((drag.parasitic_coefficient(&dirty) - (0.2 + 0.08 + 0.05 + 0.08)).abs() < 1e-12);
    }

    #[test]
    fn lift_coefficient_limits() {
        let wing = WingSpec {
            span: 12.5,
            area: 31.0,
            efficiency: 0.8,
            max_lift_coefficient: 1.5,
        };
        assert_eq!(wing.level_flight_lift_coefficient(33_000.0, 0.0), 1.5);
        let cl = wing.level_flight_lift_coefficient(33_000.0, 10_000.0);
        assert!((cl - 33_000.0 / 310_000.0).abs() < 1e-12);
        let cdi = wing.induced_drag_coefficient(1.0);
        assert!((cdi - 1.0 / (PI * wing.aspect_ratio() * 0.8)).abs() < 1e-12);
    }
}
