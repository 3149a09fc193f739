//! Shared types for the flightdeck core: frame timing, map-frame deltas,
//! angle helpers, unit conversion and the terrain interface.
//!
//! # Conventions
//! - All internal quantities are SI (meters, kilograms, newtons, watts, m/s).
//! - Map-frame vectors are `DVec3 { x: east, y: up, z: north }`.
//! - Angles are carried in degrees; heading is clockwise from north.

pub mod types;
pub mod units;

pub use types::{
    DT, DT2, FRAME_RATE, FlatSurface, FrameDelta, Terrain, air_density, wrap_degrees,
};
pub use units::{DisplayUnits, UnitSystem};

pub fn crate_info() -> &'static str {
    "flightdeck-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
