//! Flight Dynamics: per-frame integration of an aircraft's translational and
//! rotational state from controls, thrust and drag, with ground contact.
//!
//! # Invariants
//! - Integration is a pure `(spec, state, controls) -> state` transform at a
//!   fixed timestep.
//! - A grounded aircraft has zero vertical speed, pitch and bank.
//! - Heading and bank stay wrapped to [0, 360); bank never reaches the
//!   inverted side.

pub mod config;
pub mod controls;
pub mod dynamics;
pub mod hud;
pub mod spec;
pub mod state;
pub mod taildragger;

pub use config::{ConfigError, Preset, load_aircraft, parse_aircraft};
pub use controls::{ControlAction, ControlInputs, ControlMapper};
pub use dynamics::{Aircraft, integrate};
pub use hud::Instruments;
pub use spec::AircraftSpec;
pub use state::{AircraftState, FlightPhase};
pub use taildragger::{GroundAttitude, ground_attitude};

pub fn crate_info() -> &'static str {
    "flightdeck-flight v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("flight"));
    }
}
