use flightdeck_common::Terrain;
use flightdeck_flight::FlightPhase;
use flightdeck_grid::{GridContext, GridLevel};
use flightdeck_kernel::{SimEvent, Simulation};
use serde::Serialize;
use std::fmt;

/// Read-only queries against a running simulation for debugging and the CLI.
pub struct SimInspector;

impl SimInspector {
    pub fn summary<T: Terrain>(sim: &Simulation<T>) -> SimSummary {
        let state = sim.state();
        SimSummary {
            tick: sim.tick(),
            aircraft: sim.aircraft().spec().name.clone(),
            phase: state.phase(),
            position: [state.position.x, state.position.y, state.position.z],
            airspeed: state.airspeed,
            heading: state.heading,
            pending_events: sim.events().len(),
            visible_tiles: sim.grid().visible_tile_count(),
            state_hash: sim.state_hash(),
        }
    }

    pub fn level_info(grid: &GridContext, index: usize) -> Option<LevelInfo> {
        grid.level(index).map(LevelInfo::from_level)
    }

    pub fn levels(grid: &GridContext) -> Vec<LevelInfo> {
        grid.levels().iter().map(LevelInfo::from_level).collect()
    }

    pub fn event_counts(events: &[SimEvent]) -> EventCounts {
        let mut counts = EventCounts::default();
        for event in events {
            match event {
                SimEvent::Stepped { .. } => counts.stepped += 1,
                SimEvent::Touchdown { .. } => counts.touchdowns += 1,
                SimEvent::Liftoff { .. } => counts.liftoffs += 1,
                SimEvent::Wrapped { .. } => counts.wraps += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub tick: u64,
    pub aircraft: String,
    pub phase: FlightPhase,
    /// East, altitude, north.
    pub position: [f64; 3],
    pub airspeed: f64,
    pub heading: f64,
    pub pending_events: usize,
    pub visible_tiles: usize,
    pub state_hash: u64,
}

impl fmt::Display for SimSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sim: tick={} aircraft={} phase={:?} pos=({:.1}, {:.1}, {:.1}) airspeed={:.1} hdg={:.1} events={} tiles={} hash={:016x}",
            self.tick,
            self.aircraft,
            self.phase,
            self.position[0],
            self.position[1],
            self.position[2],
            self.airspeed,
            self.heading,
            self.pending_events,
            self.visible_tiles,
            self.state_hash,
        )
    }
}

/// Layout of one grid level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelInfo {
    pub index: usize,
    pub tile_count: usize,
    pub tile_size: f64,
    pub step: usize,
    pub north_index: usize,
    pub east_index: usize,
    /// `(size, north_south_offset, east_west_offset)` of the hidden block.
    pub cutout: Option<(usize, i64, i64)>,
    pub visible_tiles: usize,
    pub north_range: (f64, f64),
    pub east_range: (f64, f64),
}

impl LevelInfo {
    fn from_level(level: &GridLevel) -> Self {
        Self {
            index: level.index(),
            tile_count: level.tile_count(),
            tile_size: level.tile_size(),
            step: level.step(),
            north_index: level.north_index(),
            east_index: level.east_index(),
            cutout: level
                .cutout()
                .map(|c| (c.size, c.north_south_offset, c.east_west_offset)),
            visible_tiles: level.visible_tiles().count(),
            north_range: range(level.north_coords()),
            east_range: range(level.east_coords()),
        }
    }
}

fn range(coords: &[f64]) -> (f64, f64) {
    coords
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

impl fmt::Display for LevelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level {}: {}x{} @ {} step {} cursor=({}, {}) visible={} z=[{:.1}, {:.1}] x=[{:.1}, {:.1}]",
            self.index,
            self.tile_count,
            self.tile_count,
            self.tile_size,
            self.step,
            self.north_index,
            self.east_index,
            self.visible_tiles,
            self.north_range.0,
            self.north_range.1,
            self.east_range.0,
            self.east_range.1,
        )?;
        if let Some((size, ns, ew)) = self.cutout {
            write!(f, " cutout={size}x{size}+({ns}, {ew})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventCounts {
    pub stepped: usize,
    pub touchdowns: usize,
    pub liftoffs: usize,
    pub wraps: usize,
}

impl fmt::Display for EventCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} touchdowns={} liftoffs={} wraps={}",
            self.stepped, self.touchdowns, self.liftoffs, self.wraps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightdeck_common::{FlatSurface, FrameDelta};
    use flightdeck_flight::{AircraftState, ControlInputs, Preset};
    use flightdeck_grid::GridConfig;
    use glam::DVec3;

    fn parked() -> Simulation {
        let spec = Preset::CarrierFighter.load().unwrap();
        Simulation::parked(spec, &GridConfig::default(), FlatSurface::default()).unwrap()
    }

    #[test]
    fn summary_of_fresh_simulation() {
        let sim = parked();
        let summary = SimInspector::summary(&sim);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.phase, FlightPhase::Grounded);
        assert_eq!(summary.pending_events, 0);
        assert_eq!(summary.visible_tiles, 256 + 240 + 240);
        assert_eq!(summary.state_hash, sim.state_hash());
    }

    #[test]
    fn summary_display() {
        let mut sim = parked();
        sim.step(&ControlInputs::default());
        let s = SimInspector::summary(&sim).to_string();
        assert!(s.contains("tick=1"));
        assert!(s.contains("Grounded"));
    }

    #[test]
    fn level_info_reports_layout() {
        let grid = GridContext::new(&GridConfig::default()).unwrap();
        let info = SimInspector::level_info(&grid, 1).unwrap();
        assert_eq!(info.tile_count, 16);
        assert_eq!(info.cutout, Some((4, 6, 6)));
        assert_eq!(info.north_range, (-3000.0, 3000.0));
        assert!(SimInspector::level_info(&grid, 3).is_none());
        assert!(info.to_string().contains("cutout=4x4+(6, 6)"));
        assert_eq!(SimInspector::levels(&grid).len(), 3);
    }

    #[test]
    fn level_info_tracks_scrolling() {
        let mut grid = GridContext::new(&GridConfig::default()).unwrap();
        grid.update(&FrameDelta::horizontal(0.0, -200.0, 0.0));
        let info = SimInspector::level_info(&grid, 0).unwrap();
        assert_eq!(info.north_index, 11);
        let outer = SimInspector::level_info(&grid, 1).unwrap();
        assert_eq!(outer.cutout, Some((4, 5, 6)));
    }

    #[test]
    fn counts_events() {
        let spec = Preset::CarrierFighter.load().unwrap();
        let mut initial = AircraftState::airborne(DVec3::new(0.0, 300.0, 0.0), 90.0);
        initial.velocity = DVec3::new(150.0, 0.0, 0.0);
        let mut sim =
            Simulation::new(spec, initial, &GridConfig::default(), FlatSurface::default())
                .unwrap();
        for _ in 0..120 {
            sim.step(&ControlInputs::default());
        }
        let counts = SimInspector::event_counts(sim.events());
        assert_eq!(counts.stepped, 120);
        assert!(counts.wraps > 0);
        assert_eq!(counts.touchdowns, 0);
    }
}
