use flightdeck_common::{FlatSurface, FrameDelta, Terrain};
use flightdeck_flight::{
    Aircraft, AircraftSpec, AircraftState, ConfigError, ControlInputs, FlightPhase,
};
use flightdeck_grid::{GridConfig, GridContext, GridError, WrapEvent};
use serde::{Deserialize, Serialize};

/// An event record produced by every frame.
///
/// `Stepped` carries the full control vector, so the `Stepped` events alone
/// are enough to replay a run. The others are derived and informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Simulation advanced one frame with these controls.
    Stepped { tick: u64, controls: ControlInputs },
    /// Aircraft settled onto the ground.
    Touchdown { tick: u64, airspeed: f64 },
    /// Aircraft left the ground.
    Liftoff { tick: u64 },
    /// A grid level recycled tiles.
    Wrapped { tick: u64, wrap: WrapEvent },
}

impl SimEvent {
    pub fn tick(&self) -> u64 {
        match self {
            Self::Stepped { tick, .. }
            | Self::Touchdown { tick, .. }
            | Self::Liftoff { tick }
            | Self::Wrapped { tick, .. } => *tick,
        }
    }
}

/// What one frame did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub tick: u64,
    pub delta: FrameDelta,
    pub phase: FlightPhase,
    pub wraps: Vec<WrapEvent>,
}

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("aircraft: {0}")]
    Aircraft(#[from] ConfigError),
    #[error("grid: {0}")]
    Grid(#[from] GridError),
}

/// The authoritative frame loop: one aircraft, one grid, one terrain.
///
/// Every frame runs flight first, then feeds the resulting [`FrameDelta`]
/// to the grid, so the grid always reflects the aircraft state of the same
/// frame. Nothing else mutates either.
#[derive(Debug, Clone)]
pub struct Simulation<T: Terrain = FlatSurface> {
    aircraft: Aircraft,
    grid: GridContext,
    terrain: T,
    tick: u64,
    /// Append-only log of every frame.
    event_log: Vec<SimEvent>,
}

impl<T: Terrain> Simulation<T> {
    pub fn new(
        spec: AircraftSpec,
        initial: AircraftState,
        grid_config: &GridConfig,
        terrain: T,
    ) -> Result<Self, SimError> {
        spec.validate()?;
        let mut grid = GridContext::new(grid_config)?;
        grid.update(&FrameDelta {
            altitude: initial.position.y,
            heading: initial.heading,
            ..FrameDelta::default()
        });
        tracing::debug!(aircraft = %spec.name, "simulation created");
        Ok(Self {
            aircraft: Aircraft::new(spec, initial),
            grid,
            terrain,
            tick: 0,
            event_log: Vec::new(),
        })
    }

    /// Start parked at the map origin, resting on the terrain.
    pub fn parked(
        spec: AircraftSpec,
        grid_config: &GridConfig,
        terrain: T,
    ) -> Result<Self, SimError> {
        let ground = terrain.elevation(0.0, 0.0);
        let initial = AircraftState::parked(0.0, 0.0, ground, spec.min_agl, 0.0);
        Self::new(spec, initial, grid_config, terrain)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn aircraft(&self) -> &Aircraft {
        &self.aircraft
    }

    pub fn state(&self) -> &AircraftState {
        self.aircraft.state()
    }

    pub fn grid(&self) -> &GridContext {
        &self.grid
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    /// Advance one frame.
    pub fn step(&mut self, controls: &ControlInputs) -> FrameReport {
        let tick = self.tick + 1;
        let _span = tracing::info_span!("sim_step", tick).entered();

        let before = self.aircraft.state().phase();
        let delta = self.aircraft.step(controls, &self.terrain);
        let wraps = self.grid.update(&delta);
        let phase = self.aircraft.state().phase();

        self.tick = tick;
        self.event_log.push(SimEvent::Stepped {
            tick,
            controls: *controls,
        });
        match (before, phase) {
            (FlightPhase::Airborne, FlightPhase::Grounded) => {
                self.event_log.push(SimEvent::Touchdown {
                    tick,
                    airspeed: self.aircraft.state().airspeed,
                });
            }
            (FlightPhase::Grounded, FlightPhase::Airborne) => {
                self.event_log.push(SimEvent::Liftoff { tick });
            }
            _ => {}
        }
        self.event_log.extend(
            wraps
                .iter()
                .map(|&wrap| SimEvent::Wrapped { tick, wrap }),
        );

        FrameReport {
            tick,
            delta,
            phase,
            wraps,
        }
    }

    /// Rebuild a run from its `Stepped` events. Derived events are ignored
    /// and regenerated.
    pub fn replay(
        spec: AircraftSpec,
        initial: AircraftState,
        grid_config: &GridConfig,
        terrain: T,
        events: &[SimEvent],
    ) -> Result<Self, SimError> {
        let mut sim = Self::new(spec, initial, grid_config, terrain)?;
        for event in events {
            if let SimEvent::Stepped { controls, .. } = event {
                sim.step(controls);
            }
        }
        Ok(sim)
    }

    /// Put back a captured frame and forget events logged after it.
    pub(crate) fn restore_frame(&mut self, tick: u64, state: AircraftState, grid: GridContext) {
        self.tick = tick;
        self.aircraft.set_state(state);
        self.grid = grid;
        self.event_log.retain(|e| e.tick() <= tick);
    }

    /// Deterministic FNV-1a hash over the tick, the aircraft state and every
    /// grid level.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let s = self.aircraft.state();
        mix(&mut h, &self.tick.to_le_bytes());
        for v in [
            s.pitch,
            s.bank,
            s.heading,
            s.body_velocity.forward,
            s.body_velocity.lateral,
            s.body_velocity.vertical,
            s.position.x,
            s.position.y,
            s.position.z,
            s.equipment.throttle,
            s.equipment.flaps,
            s.equipment.gear,
            s.equipment.brake,
        ] {
            mix(&mut h, &v.to_le_bytes());
        }
        mix(&mut h, &[s.ground_contact as u8]);
        for level in self.grid.levels() {
            mix(&mut h, &(level.north_index() as u64).to_le_bytes());
            mix(&mut h, &(level.east_index() as u64).to_le_bytes());
            for v in level.north_coords().iter().chain(level.east_coords()) {
                mix(&mut h, &v.to_le_bytes());
            }
            if let Some(c) = level.cutout() {
                mix(&mut h, &c.north_south_offset.to_le_bytes());
                mix(&mut h, &c.east_west_offset.to_le_bytes());
            }
        }
        h
    }
}
