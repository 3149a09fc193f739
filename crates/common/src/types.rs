use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Simulation frames per second.
pub const FRAME_RATE: f64 = 60.0;

/// Fixed timestep (seconds).
pub const DT: f64 = 1.0 / FRAME_RATE;

/// Square of the fixed timestep.
pub const DT2: f64 = DT * DT;

/// Sea-level air density (kg/m³).
const SEA_LEVEL_DENSITY: f64 = 1.225;

/// Tropopause altitude (m). Density is held constant above it.
const TROPOPAUSE: f64 = 11_000.0;

/// One frame's observer motion, handed from flight dynamics to the grid.
///
/// Small and `Copy` so it can cross a producer/consumer boundary by value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameDelta {
    /// Map-frame displacement this frame (x east, y up, z north).
    pub displacement: DVec3,
    /// Observer altitude after the frame.
    pub altitude: f64,
    /// Observer heading after the frame, degrees in [0, 360).
    pub heading: f64,
}

impl FrameDelta {
    /// A delta that only carries a horizontal displacement at a fixed altitude.
    pub fn horizontal(east: f64, north: f64, altitude: f64) -> Self {
        Self {
            displacement: DVec3::new(east, 0.0, north),
            altitude,
            heading: 0.0,
        }
    }
}

/// Source of ground elevation beneath a map position.
pub trait Terrain {
    /// Ground elevation (m) at the given east/north map coordinates.
    fn elevation(&self, east: f64, north: f64) -> f64;
}

/// Uniform surface at a fixed elevation (open ocean by default).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlatSurface {
    pub elevation: f64,
}

impl FlatSurface {
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }
}

impl Terrain for FlatSurface {
    fn elevation(&self, _east: f64, _north: f64) -> f64 {
        self.elevation
    }
}

/// Wrap an angle in degrees into [0, 360).
///
/// `rem_euclid` can round tiny negative inputs up to exactly 360.0, which is
/// folded back to 0.
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// ISA troposphere air density (kg/m³) at the given altitude (m).
pub fn air_density(altitude: f64) -> f64 {
    let h = altitude.clamp(0.0, TROPOPAUSE);
    SEA_LEVEL_DENSITY * (1.0 - 2.255_77e-5 * h).powf(4.255_88)
}
