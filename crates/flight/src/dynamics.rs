//! Per-frame integration of aircraft state.
//!
//! The model is deliberately simple: thrust and parasitic drag act along the
//! body's forward and lateral axes, vertical motion is an input-driven
//! accumulator, and sideslip is fed back into heading so the aircraft
//! weathercocks into its direction of travel.

use flightdeck_common::{DT, FrameDelta, Terrain, air_density, wrap_degrees};
use glam::DVec3;

use crate::controls::ControlInputs;
use crate::spec::AircraftSpec;
use crate::state::{AircraftState, DragCoefficients, FlightPhase};

/// Both body-frame speed components must exceed this (m/s) before the
/// direction of travel is trusted.
const TRACK_SPEED_THRESHOLD: f64 = 1.0;

/// Speed (m/s) at which sideslip produces one degree of yaw per frame per
/// unit sine of track error.
const WEATHERCOCK_REFERENCE_SPEED: f64 = 135.0;

/// Gain on pitch (deg) in the attitude thrust multiplier.
const ATTITUDE_THRUST_GAIN: f64 = 0.15;

/// Advance `prev` by one fixed timestep.
///
/// `ground_elevation` is the terrain height beneath the aircraft.
///
/// # Preconditions
/// `spec` has passed [`AircraftSpec::validate`]; in particular `mass > 0`.
pub fn integrate(
    spec: &AircraftSpec,
    prev: &AircraftState,
    controls: &ControlInputs,
    ground_elevation: f64,
) -> AircraftState {
    let mut s = *prev;
    s.ground_elevation = ground_elevation;
    let floor = ground_elevation + spec.min_agl;

    s.equipment.throttle = (s.equipment.throttle + controls.throttle_delta).clamp(0.0, 1.0);
    s.equipment.flaps = fraction(controls.flaps_pct);
    s.equipment.gear = fraction(controls.gear_pct);
    s.equipment.brake = fraction(controls.brake_pct);

    if s.ground_contact {
        if controls.climb > 0.0 {
            s.ground_contact = false;
        }
    } else if s.position.y <= floor {
        s.ground_contact = true;
    }

    s.rates = Default::default();
    if !s.ground_contact {
        s.rates.pitch = controls.pitch;
        s.rates.bank = controls.bank;
        s.rates.yaw = controls.yaw;
    }

    let max_vs = spec.attitude.max_vertical_speed;
    let vertical = if s.ground_contact {
        0.0
    } else {
        (s.body_velocity.vertical + controls.climb).clamp(-max_vs, max_vs)
    };

    // Heading may have changed since the body speeds were stored; rebuild
    // them from the map-frame velocity.
    let (sin_h, cos_h) = s.heading.to_radians().sin_cos();
    let mut forward = s.velocity.z * cos_h + s.velocity.x * sin_h;
    let mut lateral = s.velocity.x * cos_h - s.velocity.z * sin_h;

    let rho = air_density(s.position.y);
    let (thrust_forward, thrust_lateral) = thrust(spec, &s, forward);
    let cd = spec.drag.parasitic_coefficient(&s.equipment);
    let drag_forward = axis_drag(rho, forward, spec.drag.frontal_area, cd);
    let drag_lateral = axis_drag(rho, lateral, spec.drag.frontal_area, cd);

    forward += (thrust_forward - drag_forward) / spec.mass * DT;
    lateral += (thrust_lateral - drag_lateral) / spec.mass * DT;
    if s.ground_contact {
        forward = 0.0;
        lateral = 0.0;
    }

    if forward.abs() > TRACK_SPEED_THRESHOLD && lateral.abs() > TRACK_SPEED_THRESHOLD {
        let track_error = lateral.atan2(forward);
        let speed = forward.hypot(lateral);
        s.rates.yaw += track_error.sin() * (speed / WEATHERCOCK_REFERENCE_SPEED);
    }

    let limits = &spec.attitude;
    s.pitch = (s.pitch + s.rates.pitch).clamp(-limits.pitch_limit, limits.pitch_limit);
    s.bank = clamp_bank(wrap_degrees(s.bank + s.rates.bank), limits.bank_limit);
    s.heading = wrap_degrees(s.heading + s.rates.yaw);

    let (sin_h, cos_h) = s.heading.to_radians().sin_cos();
    s.body_velocity.forward = forward;
    s.body_velocity.lateral = lateral;
    s.body_velocity.vertical = vertical;
    s.velocity = DVec3::new(
        forward * sin_h + lateral * cos_h,
        vertical,
        forward * cos_h - lateral * sin_h,
    );
    s.position += s.velocity * DT;

    if s.ground_contact || s.position.y <= floor {
        s.settle_on_ground(floor);
    }

    update_air_data(spec, &mut s);
    s
}

/// Keep bank within `limit` of wings-level on either side of the 180° seam.
///
/// `bank` must already be wrapped to [0, 360).
pub fn clamp_bank(bank: f64, limit: f64) -> f64 {
    if bank > limit && bank <= 180.0 {
        limit
    } else if bank > 180.0 && bank < 360.0 - limit {
        360.0 - limit
    } else {
        bank
    }
}

/// Smooth 0→1 throttle response: gentle at both ends of the lever.
pub fn throttle_response(throttle: f64) -> f64 {
    let t = throttle.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Forward and lateral thrust (N).
///
/// The throttle term drives the forward axis. An attitude term, growing with
/// the square of pitch, trades forward thrust for nose-down attitude and
/// pushes sideways with bank.
fn thrust(spec: &AircraftSpec, s: &AircraftState, forward_speed: f64) -> (f64, f64) {
    let engine = spec.propulsion.available_thrust(forward_speed)
        * throttle_response(s.equipment.throttle);
    let multiplier = (ATTITUDE_THRUST_GAIN * s.pitch).powi(2).max(1.0) / 5.0;
    let attitude = spec.propulsion.max_thrust * multiplier;
    let forward = engine - attitude * s.pitch.to_radians().sin();
    let lateral = attitude * s.bank.to_radians().sin();
    (forward, lateral)
}

/// Drag along one axis, signed against the velocity on that axis.
fn axis_drag(rho: f64, v: f64, area: f64, cd: f64) -> f64 {
    0.5 * rho * v * v.abs() * area * cd
}

fn fraction(pct: f64) -> f64 {
    (pct / 100.0).clamp(0.0, 1.0)
}

fn update_air_data(spec: &AircraftSpec, s: &mut AircraftState) {
    let v = s.body_velocity;
    s.airspeed = (v.forward * v.forward + v.lateral * v.lateral + v.vertical * v.vertical).sqrt();
    s.dynamic_pressure = 0.5 * air_density(s.position.y) * s.airspeed * s.airspeed;
    s.lift_coefficient = spec
        .wing
        .level_flight_lift_coefficient(spec.weight(), s.dynamic_pressure);
    s.drag = DragCoefficients {
        parasitic: spec.drag.parasitic_coefficient(&s.equipment),
        induced: spec.wing.induced_drag_coefficient(s.lift_coefficient),
    };
}

/// An aircraft type paired with its live state.
#[derive(Debug, Clone)]
pub struct Aircraft {
    spec: AircraftSpec,
    state: AircraftState,
}

impl Aircraft {
    pub fn new(spec: AircraftSpec, state: AircraftState) -> Self {
        Self { spec, state }
    }

    pub fn spec(&self) -> &AircraftSpec {
        &self.spec
    }

    pub fn state(&self) -> &AircraftState {
        &self.state
    }

    /// Replace the live state (snapshot restore).
    pub fn set_state(&mut self, state: AircraftState) {
        self.state = state;
    }

    /// Integrate one frame over `terrain` and return the observer motion.
    pub fn step(&mut self, controls: &ControlInputs, terrain: &dyn Terrain) -> FrameDelta {
        let before = self.state;
        let ground = terrain.elevation(before.position.x, before.position.z);
        self.state = integrate(&self.spec, &before, controls, ground);

        match (before.phase(), self.state.phase()) {
            (FlightPhase::Airborne, FlightPhase::Grounded) => tracing::debug!(
                aircraft = %self.spec.name,
                speed = before.airspeed,
                "touchdown"
            ),
            (FlightPhase::Grounded, FlightPhase::Airborne) => {
                tracing::debug!(aircraft = %self.spec.name, "liftoff")
            }
            _ => {}
        }

        FrameDelta {
            displacement: self.state.position - before.position,
            altitude: self.state.position.y,
            heading: self.state.heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use flightdeck_common::FlatSurface;

    fn fighter() -> AircraftSpec {
        Preset::CarrierFighter.load().unwrap()
    }

    /// Deterministic pseudo-random sequence in [-1, 1].
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ((self.0 >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
        }
    }

    #[test]
    fn forward_speed_rises_monotonically_and_levels_off() {
        let spec = fighter();
        assert_eq!(spec.mass, 3400.0);
        let mut s = AircraftState::airborne(DVec3::new(0.0, 1000.0, 0.0), 0.0);
        let controls = ControlInputs::full_throttle();

        let mut last_speed = 0.0;
        let mut last_accel = f64::INFINITY;
        for _ in 0..60 {
            s = integrate(&spec, &s, &controls, 0.0);
            let speed = s.body_velocity.forward;
            let accel = speed - last_speed;
            assert!(accel > 0.0, "speed must rise every frame");
            assert!(accel <= last_accel + 1e-12, "drag must slow the gain");
            last_speed = speed;
            last_accel = accel;
        }
        // One second at ~4 m/s² from rest.
        assert!(last_speed > 3.5 && last_speed < 4.1, "got {last_speed}");

        // Four simulated minutes: converges instead of diverging.
        let rho = air_density(1000.0);
        let terminal =
            (2.0 * spec.propulsion.max_thrust / (rho * spec.drag.frontal_area * spec.drag.parasitic))
                .sqrt();
        let mut previous = last_speed;
        let mut one_second_ago = 0.0;
        for frame in 0..14_400 {
            s = integrate(&spec, &s, &ControlInputs::default(), 0.0);
            let speed = s.body_velocity.forward;
            assert!(speed >= previous);
            assert!(speed < terminal);
            previous = speed;
            if frame == 14_339 {
                one_second_ago = speed;
            }
        }
        assert!(s.body_velocity.forward - one_second_ago < 0.01);
        assert_eq!(s.heading, 0.0);
        assert_eq!(s.body_velocity.lateral, 0.0);
    }

    #[test]
    fn heading_always_wrapped() {
        let spec = fighter();
        let mut rng = Lcg(7);
        let mut s = AircraftState::airborne(DVec3::new(0.0, 2000.0, 0.0), 0.0);
        for _ in 0..5_000 {
            let controls = ControlInputs {
                pitch: rng.next() * 3.0,
                bank: rng.next() * 50.0,
                yaw: rng.next() * 400.0,
                throttle_delta: rng.next() * 0.1,
                ..Default::default()
            };
            s = integrate(&spec, &s, &controls, 0.0);
            assert!((0.0..360.0).contains(&s.heading), "heading {}", s.heading);
            assert!((0.0..360.0).contains(&s.bank));
        }
    }

    #[test]
    fn bank_never_enters_the_back_side() {
        let spec = fighter();
        let limit = spec.attitude.bank_limit;
        let mut rng = Lcg(99);
        let mut s = AircraftState::airborne(DVec3::new(0.0, 2000.0, 0.0), 45.0);
        for _ in 0..5_000 {
            let controls = ControlInputs {
                bank: rng.next() * 270.0,
                throttle_delta: 0.01,
                ..Default::default()
            };
            s = integrate(&spec, &s, &controls, 0.0);
            let b = s.bank;
            assert!(b <= limit || b >= 360.0 - limit, "bank {b}");
        }
    }

    #[test]
    fn clamp_bank_picks_nearer_side() {
        assert_eq!(clamp_bank(10.0, 30.0), 10.0);
        assert_eq!(clamp_bank(45.0, 30.0), 30.0);
        assert_eq!(clamp_bank(180.0, 30.0), 30.0);
        assert_eq!(clamp_bank(181.0, 30.0), 330.0);
        assert_eq!(clamp_bank(300.0, 30.0), 330.0);
        assert_eq!(clamp_bank(345.0, 30.0), 345.0);
    }

    #[test]
    fn pitch_clamped_to_limit() {
        let spec = fighter();
        let mut s = AircraftState::airborne(DVec3::new(0.0, 1000.0, 0.0), 0.0);
        for _ in 0..100 {
            s = integrate(&spec, &s, &ControlInputs { pitch: 1.0, ..Default::default() }, 0.0);
        }
        assert_eq!(s.pitch, 15.0);
        for _ in 0..100 {
            s = integrate(&spec, &s, &ControlInputs { pitch: -1.0, ..Default::default() }, 0.0);
        }
        assert_eq!(s.pitch, -15.0);
    }

    #[test]
    fn vertical_speed_accumulator_is_capped() {
        let spec = fighter();
        let mut s = AircraftState::airborne(DVec3::new(0.0, 1000.0, 0.0), 0.0);
        for _ in 0..30 {
            s = integrate(&spec, &s, &ControlInputs { climb: 0.2, ..Default::default() }, 0.0);
        }
        assert_eq!(s.body_velocity.vertical, 0.5);
        assert!(s.altitude() > 1000.0);
        for _ in 0..30 {
            s = integrate(&spec, &s, &ControlInputs { climb: -0.2, ..Default::default() }, 0.0);
        }
        assert_eq!(s.body_velocity.vertical, -0.5);
    }

    #[test]
    fn grounded_state_holds_invariant() {
        let spec = fighter();
        let floor = spec.min_agl;
        let mut rng = Lcg(3);
        let mut s = AircraftState::airborne(DVec3::new(0.0, floor + 2.0, 0.0), 0.0);
        let mut grounded_frames = 0;
        for frame in 0..6_000 {
            // Mostly descending so the aircraft keeps meeting the ground.
            let climb = if frame % 700 < 20 { 0.05 } else { -0.05 };
            let controls = ControlInputs {
                pitch: rng.next(),
                bank: rng.next() * 5.0,
                yaw: rng.next(),
                climb,
                throttle_delta: rng.next() * 0.05,
                ..Default::default()
            };
            s = integrate(&spec, &s, &controls, 0.0);
            assert!(s.altitude() >= floor - 1e-9);
            if s.ground_contact {
                grounded_frames += 1;
                assert_eq!(s.body_velocity.vertical, 0.0);
                assert_eq!(s.pitch, 0.0);
                assert_eq!(s.bank, 0.0);
                assert_eq!(s.altitude(), floor);
            }
        }
        assert!(grounded_frames > 0);
    }

    #[test]
    fn touchdown_then_liftoff() {
        let spec = fighter();
        let floor = spec.min_agl;
        let mut s = AircraftState::airborne(DVec3::new(0.0, floor + 0.004, 0.0), 0.0);
        s = integrate(&spec, &s, &ControlInputs { climb: -0.5, ..Default::default() }, 0.0);
        assert_eq!(s.phase(), FlightPhase::Grounded);

        // Neutral or negative climb input keeps it down.
        s = integrate(&spec, &s, &ControlInputs::full_throttle(), 0.0);
        assert_eq!(s.phase(), FlightPhase::Grounded);
        assert_eq!(s.body_velocity.forward, 0.0);

        s = integrate(&spec, &s, &ControlInputs { climb: 0.5, ..Default::default() }, 0.0);
        assert_eq!(s.phase(), FlightPhase::Airborne);
        assert!(s.altitude() > floor);
    }

    #[test]
    fn ground_elevation_raises_floor() {
        let spec = fighter();
        let s = AircraftState::airborne(DVec3::new(0.0, 50.0, 0.0), 0.0);
        let s = integrate(&spec, &s, &ControlInputs::default(), 60.0);
        assert!(s.ground_contact);
        assert_eq!(s.altitude(), 60.0 + spec.min_agl);
        assert!((s.agl() - spec.min_agl).abs() < 1e-12);
    }

    #[test]
    fn bank_turns_aircraft_toward_travel() {
        let spec = fighter();
        let mut s = AircraftState::airborne(DVec3::new(0.0, 1500.0, 0.0), 0.0);
        s.velocity = DVec3::new(0.0, 0.0, 120.0);
        for _ in 0..20 {
            s = integrate(&spec, &s, &ControlInputs { bank: 1.5, ..Default::default() }, 0.0);
        }
        assert_eq!(s.bank, 30.0);
        for _ in 0..600 {
            s = integrate(&spec, &s, &ControlInputs::default(), 0.0);
        }
        // Right bank drifts right, and weathercocking swings the nose right.
        assert!(s.heading > 1.0 && s.heading < 180.0, "heading {}", s.heading);
        assert!(s.position.x > 0.0);
    }

    #[test]
    fn no_yaw_correction_below_threshold() {
        let spec = fighter();
        let mut s = AircraftState::airborne(DVec3::new(0.0, 1000.0, 0.0), 0.0);
        s.velocity = DVec3::new(0.5, 0.0, 50.0);
        let next = integrate(&spec, &s, &ControlInputs::default(), 0.0);
        assert_eq!(next.rates.yaw, 0.0);
        assert_eq!(next.heading, 0.0);
    }

    #[test]
    fn velocity_follows_heading_change() {
        let spec = fighter();
        let mut s = AircraftState::airborne(DVec3::new(0.0, 1000.0, 0.0), 0.0);
        s.velocity = DVec3::new(0.0, 0.0, 100.0);
        let s = integrate(&spec, &s, &ControlInputs { yaw: 90.0, ..Default::default() }, 0.0);
        assert_eq!(s.heading, 90.0);
        // Now travelling east, forward speed carried over.
        assert!(s.velocity.x > 99.0);
        assert!(s.velocity.z.abs() < 1e-9);
    }

    #[test]
    fn derived_air_data() {
        let spec = fighter();
        let mut s = AircraftState::airborne(DVec3::new(0.0, 500.0, 0.0), 0.0);
        s.velocity = DVec3::new(0.0, 0.0, 100.0);
        let s = integrate(&spec, &s, &ControlInputs { gear_pct: 100.0, ..Default::default() }, 0.0);
        let q = 0.5 * air_density(500.0) * s.airspeed * s.airspeed;
        assert!((s.dynamic_pressure - q).abs() < 1e-6);
        assert!(s.lift_coefficient > 0.0 && s.lift_coefficient <= spec.wing.max_lift_coefficient);
        assert!((s.drag.parasitic - 0.25).abs() < 1e-12);
        assert!(s.drag.induced > 0.0);
    }

    #[test]
    fn aircraft_step_reports_displacement() {
        let spec = fighter();
        let state = AircraftState::airborne(DVec3::new(0.0, 800.0, 0.0), 180.0);
        let mut aircraft = Aircraft::new(spec, state);
        aircraft.set_state(AircraftState {
            velocity: DVec3::new(0.0, 0.0, -60.0),
            ..*aircraft.state()
        });
        let delta = aircraft.step(&ControlInputs::default(), &FlatSurface::default());
        assert!(delta.displacement.z < 0.0);
        assert!((delta.displacement.z + 60.0 * DT).abs() < 0.01);
        assert_eq!(delta.heading, 180.0);
        assert_eq!(delta.altitude, 800.0);
    }

    #[test]
    fn throttle_response_shape() {
        assert_eq!(throttle_response(0.0), 0.0);
        assert_eq!(throttle_response(1.0), 1.0);
        assert_eq!(throttle_response(0.5), 0.5);
        assert!(throttle_response(0.25) < 0.25);
        assert_eq!(throttle_response(2.0), 1.0);
    }
}
