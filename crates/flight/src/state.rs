use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Velocity in the aircraft's own frame (m/s).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyVelocity {
    pub forward: f64,
    /// Positive to the right.
    pub lateral: f64,
    /// Positive up.
    pub vertical: f64,
}

/// Attitude rates applied this frame (deg/frame), after grounding and
/// weathercock correction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttitudeRates {
    pub pitch: f64,
    pub bank: f64,
    pub yaw: f64,
}

/// Throttle and deployable equipment, each a fraction in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub throttle: f64,
    pub flaps: f64,
    pub gear: f64,
    pub brake: f64,
}

/// Drag coefficients at the current flight condition.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragCoefficients {
    pub parasitic: f64,
    pub induced: f64,
}

impl DragCoefficients {
    pub fn total(&self) -> f64 {
        self.parasitic + self.induced
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    Airborne,
    Grounded,
}

/// Complete per-frame state of one aircraft.
///
/// Owned by the integrator and replaced once per frame.
///
/// # Invariants
/// - `heading` and `bank` are in [0, 360).
/// - While `ground_contact` is set, vertical speed, pitch and bank are zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AircraftState {
    /// Degrees, positive nose up, clamped to the aircraft's pitch limit.
    pub pitch: f64,
    /// Degrees in [0, 360), positive right wing down.
    pub bank: f64,
    /// Degrees in [0, 360), clockwise from north.
    pub heading: f64,
    pub body_velocity: BodyVelocity,
    /// Map-frame velocity (x east, y up, z north).
    pub velocity: DVec3,
    /// Map-frame position; `y` is altitude.
    pub position: DVec3,
    pub rates: AttitudeRates,
    pub equipment: Equipment,
    pub ground_contact: bool,
    /// Ground elevation under the aircraft last frame.
    pub ground_elevation: f64,
    /// Total airspeed (m/s).
    pub airspeed: f64,
    /// Dynamic pressure (Pa).
    pub dynamic_pressure: f64,
    pub lift_coefficient: f64,
    pub drag: DragCoefficients,
}

impl AircraftState {
    /// In flight at `position` with the given heading, wings level, at rest.
    pub fn airborne(position: DVec3, heading: f64) -> Self {
        Self {
            pitch: 0.0,
            bank: 0.0,
            heading: flightdeck_common::wrap_degrees(heading),
            body_velocity: BodyVelocity::default(),
            velocity: DVec3::ZERO,
            position,
            rates: AttitudeRates::default(),
            equipment: Equipment::default(),
            ground_contact: false,
            ground_elevation: 0.0,
            airspeed: 0.0,
            dynamic_pressure: 0.0,
            lift_coefficient: 0.0,
            drag: DragCoefficients::default(),
        }
    }

    /// Sitting on the ground at `ground_elevation + min_agl`, gear down.
    pub fn parked(east: f64, north: f64, ground_elevation: f64, min_agl: f64, heading: f64) -> Self {
        let mut state = Self::airborne(
            DVec3::new(east, ground_elevation + min_agl, north),
            heading,
        );
        state.ground_contact = true;
        state.ground_elevation = ground_elevation;
        state.equipment.gear = 1.0;
        state
    }

    pub fn phase(&self) -> FlightPhase {
        if self.ground_contact {
            FlightPhase::Grounded
        } else {
            FlightPhase::Airborne
        }
    }

    pub fn altitude(&self) -> f64 {
        self.position.y
    }

    /// Height above the ground beneath the aircraft.
    pub fn agl(&self) -> f64 {
        self.position.y - self.ground_elevation
    }

    /// Horizontal ground speed (m/s).
    pub fn ground_speed(&self) -> f64 {
        self.velocity.x.hypot(self.velocity.z)
    }

    /// Pin the aircraft to the runway/deck floor and kill all motion.
    pub(crate) fn settle_on_ground(&mut self, floor: f64) {
        self.ground_contact = true;
        self.position.y = floor;
        self.rates = AttitudeRates::default();
        self.pitch = 0.0;
        self.bank = 0.0;
        self.body_velocity = BodyVelocity::default();
        self.velocity = DVec3::ZERO;
    }
}
