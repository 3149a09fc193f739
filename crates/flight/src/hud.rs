use flightdeck_common::DisplayUnits;
use serde::Serialize;
use std::fmt;

use crate::state::AircraftState;

/// Read-only instrument snapshot for the HUD layer.
#[derive(Debug, Clone, Serialize)]
pub struct Instruments {
    pub units: DisplayUnits,
    pub airspeed: f64,
    pub altitude: f64,
    /// Vertical speed in display altitude units per minute.
    pub vertical_speed: f64,
    pub heading: f64,
    pub pitch: f64,
    /// Signed bank, negative left wing down.
    pub bank: f64,
    pub throttle_pct: f64,
    pub flaps_pct: f64,
    pub gear_pct: f64,
    pub brake_pct: f64,
    pub lift_coefficient: f64,
    pub parasitic_drag: f64,
    pub induced_drag: f64,
    pub on_ground: bool,
}

impl Instruments {
    pub fn read(state: &AircraftState, units: DisplayUnits) -> Self {
        let bank = if state.bank > 180.0 {
            state.bank - 360.0
        } else {
            state.bank
        };
        Self {
            units,
            airspeed: units.speed(state.airspeed),
            altitude: units.altitude(state.altitude()),
            vertical_speed: units.altitude(state.body_velocity.vertical) * 60.0,
            heading: state.heading,
            pitch: state.pitch,
            bank,
            throttle_pct: state.equipment.throttle * 100.0,
            flaps_pct: state.equipment.flaps * 100.0,
            gear_pct: state.equipment.gear * 100.0,
            brake_pct: state.equipment.brake * 100.0,
            lift_coefficient: state.lift_coefficient,
            parasitic_drag: state.drag.parasitic,
            induced_drag: state.drag.induced,
            on_ground: state.ground_contact,
        }
    }
}

impl fmt::Display for Instruments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPD {:>5.0} {} ALT {:>6.0} {} HDG {:03.0} PIT {:+5.1} BNK {:+5.1} THR {:>3.0}% CL {:.2}{}",
            self.airspeed,
            self.units.speed_label(),
            self.altitude,
            self.units.altitude_label(),
            self.heading,
            self.pitch,
            self.bank,
            self.throttle_pct,
            self.lift_coefficient,
            if self.on_ground { " [GND]" } else { "" },
        )
    }
}
