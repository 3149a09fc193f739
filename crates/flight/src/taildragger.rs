//! Ground attitude of a taildragger for model placement.
//!
//! At rest the aircraft sits tail-down on its tail wheel; as ground speed
//! builds the tail lifts until the fuselage is level at `tail_lift_speed`.
//! The integrator keeps grounded pitch at zero, so this is a presentation
//! offset, not flight state.

use serde::{Deserialize, Serialize};

use crate::spec::TaildraggerSpec;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundAttitude {
    /// Nose-up pitch of the fuselage (deg).
    pub pitch: f64,
    /// Height of the CG above the ground (m).
    pub cg_height: f64,
}

pub fn ground_attitude(gear: &TaildraggerSpec, ground_speed: f64) -> GroundAttitude {
    let lift = (ground_speed.abs() / gear.tail_lift_speed).clamp(0.0, 1.0);
    let pitch = gear.max_tail_angle * (1.0 - lift);
    // Nose-up rotation about the axle swings the aft CG downward.
    let cg_height =
        gear.wheel_radius + gear.axle_to_cg * (gear.axle_angle - pitch).to_radians().sin();
    GroundAttitude { pitch, cg_height }
}
