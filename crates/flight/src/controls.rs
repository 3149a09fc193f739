use flightdeck_common::DT;
use serde::{Deserialize, Serialize};

use crate::spec::AircraftSpec;

/// One frame's control vector, as consumed by the integrator.
///
/// Values are not range-checked; the caller owns sensible inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInputs {
    /// Pitch rate (deg/frame), positive nose up.
    pub pitch: f64,
    /// Bank rate (deg/frame), positive right wing down.
    pub bank: f64,
    /// Yaw rate (deg/frame), positive clockwise.
    pub yaw: f64,
    /// Altitude differential added to vertical speed this frame (m/s).
    pub climb: f64,
    /// Change to throttle fraction this frame.
    pub throttle_delta: f64,
    pub flaps_pct: f64,
    pub gear_pct: f64,
    pub brake_pct: f64,
}

impl ControlInputs {
    /// Full throttle applied at once, everything else neutral.
    pub fn full_throttle() -> Self {
        Self {
            throttle_delta: 1.0,
            ..Self::default()
        }
    }
}

/// A high-level pilot command. Whatever produces commands (keys, a script,
/// a network peer) maps onto these; the integrator only ever sees
/// [`ControlInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlAction {
    PitchUp,
    PitchDown,
    BankLeft,
    BankRight,
    YawLeft,
    YawRight,
    ThrottleUp,
    ThrottleDown,
    Climb,
    Descend,
    /// Flap set-point in percent.
    SetFlaps(f64),
    ToggleGear,
    /// Speed-brake set-point in percent.
    SetBrake(f64),
}

/// Folds a frame's [`ControlAction`]s into [`ControlInputs`].
///
/// Rates are per second and scaled by `DT`; equipment set-points persist
/// across frames.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlMapper {
    /// deg/s
    pub pitch_rate: f64,
    /// deg/s, from the aircraft's roll authority.
    pub bank_rate: f64,
    /// deg/s
    pub yaw_rate: f64,
    /// Vertical speed change per frame while climbing/descending (m/s).
    pub climb_step: f64,
    /// Throttle fraction per second.
    pub throttle_rate: f64,
    flaps_pct: f64,
    gear_pct: f64,
    brake_pct: f64,
}

impl ControlMapper {
    pub fn for_aircraft(spec: &AircraftSpec) -> Self {
        Self {
            pitch_rate: 20.0,
            bank_rate: spec.attitude.max_bank_rate,
            yaw_rate: 10.0,
            // Full vertical speed in half a second.
            climb_step: spec.attitude.max_vertical_speed / 30.0,
            throttle_rate: 0.5,
            flaps_pct: 0.0,
            gear_pct: 100.0,
            brake_pct: 0.0,
        }
    }

    pub fn gear_pct(&self) -> f64 {
        self.gear_pct
    }

    /// Build this frame's inputs from the held actions.
    pub fn map(&mut self, actions: &[ControlAction]) -> ControlInputs {
        let mut inputs = ControlInputs::default();
        for action in actions {
            match *action {
                ControlAction::PitchUp => inputs.pitch += self.pitch_rate * DT,
                ControlAction::PitchDown => inputs.pitch -= self.pitch_rate * DT,
                ControlAction::BankLeft => inputs.bank -= self.bank_rate * DT,
                ControlAction::BankRight => inputs.bank += self.bank_rate * DT,
                ControlAction::YawLeft => inputs.yaw -= self.yaw_rate * DT,
                ControlAction::YawRight => inputs.yaw += self.yaw_rate * DT,
                ControlAction::ThrottleUp => inputs.throttle_delta += self.throttle_rate * DT,
                ControlAction::ThrottleDown => inputs.throttle_delta -= self.throttle_rate * DT,
                ControlAction::Climb => inputs.climb += self.climb_step,
                ControlAction::Descend => inputs.climb -= self.climb_step,
                ControlAction::SetFlaps(pct) => self.flaps_pct = pct.clamp(0.0, 100.0),
                ControlAction::ToggleGear => {
                    self.gear_pct = if self.gear_pct > 50.0 { 0.0 } else { 100.0 };
                }
                ControlAction::SetBrake(pct) => self.brake_pct = pct.clamp(0.0, 100.0),
            }
        }
        // Opposing keys cancel; a doubled key never exceeds the roll authority.
        let max_bank = self.bank_rate * DT;
        inputs.bank = inputs.bank.clamp(-max_bank, max_bank);
        inputs.flaps_pct = self.flaps_pct;
        inputs.gear_pct = self.gear_pct;
        inputs.brake_pct = self.brake_pct;
        inputs
    }
}
