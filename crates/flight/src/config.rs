//! YAML aircraft configuration.
//!
//! Documents declare `units: metric | imperial`; every quantity is converted
//! to SI here and nowhere else.
//!
//! | quantity | metric | imperial |
//! |---|---|---|
//! | length, area | m, m² | ft, ft² |
//! | mass | kg | lb |
//! | thrust | N | lbf |
//! | power | kW | hp |
//! | tail lift speed | km/h | mph |
//! | vertical speed | m/s | ft/s |

use flightdeck_common::UnitSystem;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::spec::{AircraftSpec, AttitudeLimits, DragSpec, PropulsionSpec, TaildraggerSpec, WingSpec};
use crate::taildragger;

/// Errors from loading or validating aircraft configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("unknown aircraft preset: {0}")]
    UnknownPreset(String),
}

/// An aircraft document as written, before unit conversion.
#[derive(Debug, Deserialize)]
pub struct AircraftDocument {
    pub name: String,
    #[serde(default)]
    pub units: UnitSystem,
    pub mass: f64,
    pub wing: WingSpec,
    pub propulsion: PropulsionSpec,
    pub drag: DragSpec,
    pub taildragger: TaildraggerSpec,
    #[serde(default)]
    pub attitude: AttitudeLimits,
    /// Defaults to the resting CG height over the main wheels.
    #[serde(default)]
    pub min_agl: Option<f64>,
}

impl AircraftDocument {
    /// Convert to SI and validate.
    pub fn into_spec(self) -> Result<AircraftSpec, ConfigError> {
        let u = self.units;
        let taildragger = TaildraggerSpec {
            axle_to_cg: u.length(self.taildragger.axle_to_cg),
            axle_angle: self.taildragger.axle_angle,
            wheel_radius: u.length(self.taildragger.wheel_radius),
            max_tail_angle: self.taildragger.max_tail_angle,
            tail_lift_speed: u.speed(self.taildragger.tail_lift_speed),
        };
        let min_agl = match self.min_agl {
            Some(v) => u.length(v),
            None => taildragger::ground_attitude(&taildragger, 0.0).cg_height,
        };
        let spec = AircraftSpec {
            name: self.name,
            mass: u.mass(self.mass),
            wing: WingSpec {
                span: u.length(self.wing.span),
                area: u.area(self.wing.area),
                ..self.wing
            },
            propulsion: PropulsionSpec {
                max_thrust: u.force(self.propulsion.max_thrust),
                max_power: u.power(self.propulsion.max_power),
                propeller_efficiency: self.propulsion.propeller_efficiency,
            },
            drag: DragSpec {
                frontal_area: u.area(self.drag.frontal_area),
                ..self.drag
            },
            taildragger,
            attitude: AttitudeLimits {
                max_vertical_speed: u.length(self.attitude.max_vertical_speed),
                ..self.attitude
            },
            min_agl,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Parse and validate an aircraft spec from YAML text.
pub fn parse_aircraft(yaml: &str) -> Result<AircraftSpec, ConfigError> {
    let doc: AircraftDocument = serde_yaml::from_str(yaml)?;
    doc.into_spec()
}

/// Load and validate an aircraft spec from a YAML file.
pub fn load_aircraft(path: impl AsRef<Path>) -> Result<AircraftSpec, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let spec = parse_aircraft(&text)?;
    tracing::debug!(path = %path.display(), name = %spec.name, "loaded aircraft spec");
    Ok(spec)
}

/// Aircraft types shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    CarrierFighter,
    Biplane,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::CarrierFighter, Preset::Biplane];

    pub fn key(self) -> &'static str {
        match self {
            Self::CarrierFighter => "fighter",
            Self::Biplane => "biplane",
        }
    }

    fn yaml(self) -> &'static str {
        match self {
            Self::CarrierFighter => include_str!("../presets/carrier_fighter.yaml"),
            Self::Biplane => include_str!("../presets/biplane.yaml"),
        }
    }

    pub fn load(self) -> Result<AircraftSpec, ConfigError> {
        parse_aircraft(self.yaml())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fighter_preset_is_metric_passthrough() {
        let spec = Preset::CarrierFighter.load().unwrap();
        assert_eq!(spec.mass, 3400.0);
        assert_eq!(spec.propulsion.max_thrust, 13_762.0);
        assert_eq!(spec.propulsion.max_power, 1_500_000.0);
        assert!((spec.taildragger.tail_lift_speed - 110.0 / 3.6).abs() < 1e-9);
        assert_eq!(spec.attitude.max_vertical_speed, 0.5);
    }

    #[test]
    fn biplane_preset_converts_imperial() {
        let spec = Preset::Biplane.load().unwrap();
        assert!((spec.mass - 659.07).abs() < 0.01);
        assert!((spec.wing.span - 8.5344).abs() < 1e-6);
        assert!((spec.propulsion.max_power - 96_941.0).abs() < 1.0);
        assert!((spec.attitude.max_vertical_speed - 0.4999).abs() < 1e-3);
        assert_eq!(spec.drag.flaps, 0.0);
    }

    #[test]
    fn min_agl_defaults_to_resting_cg_height() {
        let spec = Preset::CarrierFighter.load().unwrap();
        let expected = 0.45 + 1.8 * (35.0_f64 - 12.0).to_radians().sin();
        assert!((spec.min_agl - expected).abs() < 1e-9);
    }

    #[test]
    fn explicit_min_agl_converted() {
        let yaml = Preset::Biplane.yaml().to_string() + "min_agl: 10\n";
        let spec = parse_aircraft(&yaml).unwrap();
        assert!((spec.min_agl - 3.048).abs() < 1e-9);
    }

    #[test]
    fn attitude_block_is_optional() {
        let yaml: String = Preset::CarrierFighter
            .yaml()
            .lines()
            .take_while(|l| !l.starts_with("attitude:"))
            .map(|l| format!("{l}\n"))
            .collect();
        let spec = parse_aircraft(&yaml).unwrap();
        assert_eq!(spec.attitude, AttitudeLimits::default());
    }

    #[test]
    fn invalid_mass_fails_at_load() {
        let yaml = Preset::CarrierFighter
            .yaml()
            .replace("mass: 3400", "mass: 0");
        assert!(matches!(
            parse_aircraft(&yaml),
            Err(ConfigError::NonPositive { field: "mass", .. })
        ));
    }

    #[test]
    fn malformed_yaml_reports_parse_error() {
        assert!(matches!(
            parse_aircraft("name: [unterminated"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(Preset::Biplane.yaml().as_bytes()).unwrap();
        let spec = load_aircraft(file.path()).unwrap();
        assert_eq!(spec.name, "WWI Biplane");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_aircraft(dir.path().join("nope.yaml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("fighter".parse::<Preset>().unwrap(), Preset::CarrierFighter);
        assert_eq!("Biplane".parse::<Preset>().unwrap(), Preset::Biplane);
        assert!("zeppelin".parse::<Preset>().is_err());
    }
}
