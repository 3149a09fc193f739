use flightdeck_common::Terrain;
use flightdeck_flight::AircraftState;
use flightdeck_grid::GridContext;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::simulation::Simulation;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot at tick {tick} failed its integrity check")]
    Corrupt { tick: u64 },
    #[error("no snapshot {index} (store holds {len})")]
    NotFound { index: usize, len: usize },
}

/// A hashed copy of one frame's aircraft and grid state.
///
/// The aircraft spec and terrain are not captured; a snapshot only restores
/// into a simulation built with the same ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub aircraft: AircraftState,
    pub grid: GridContext,
    /// FNV-1a over the captured fields, for corruption detection.
    pub hash: u64,
}

impl Snapshot {
    pub fn capture<T: Terrain>(sim: &Simulation<T>) -> Self {
        let tick = sim.tick();
        let aircraft = *sim.state();
        let grid = sim.grid().clone();
        let hash = content_hash(tick, &aircraft, &grid);
        Self {
            tick,
            aircraft,
            grid,
            hash,
        }
    }

    pub fn verify(&self) -> bool {
        self.hash == content_hash(self.tick, &self.aircraft, &self.grid)
    }

    /// Rewind `sim` to this frame. Events logged after it are discarded.
    pub fn restore<T: Terrain>(&self, sim: &mut Simulation<T>) -> Result<(), SnapshotError> {
        if !self.verify() {
            return Err(SnapshotError::Corrupt { tick: self.tick });
        }
        sim.restore_frame(self.tick, self.aircraft, self.grid.clone());
        tracing::debug!(tick = self.tick, "restored snapshot");
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load and verify a snapshot written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&text)?;
        if !snapshot.verify() {
            return Err(SnapshotError::Corrupt {
                tick: snapshot.tick,
            });
        }
        Ok(snapshot)
    }
}

/// In-memory snapshot history for rollback.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `sim` and return the snapshot's index.
    pub fn take_snapshot<T: Terrain>(&mut self, sim: &Simulation<T>) -> usize {
        self.snapshots.push(Snapshot::capture(sim));
        self.snapshots.len() - 1
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn get_snapshot(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Rewind `sim` to snapshot `index` and drop every later snapshot.
    pub fn rollback<T: Terrain>(
        &mut self,
        index: usize,
        sim: &mut Simulation<T>,
    ) -> Result<(), SnapshotError> {
        let len = self.snapshots.len();
        let snapshot = self
            .snapshots
            .get(index)
            .ok_or(SnapshotError::NotFound { index, len })?;
        snapshot.restore(sim)?;
        self.snapshots.truncate(index + 1);
        Ok(())
    }
}

fn content_hash(tick: u64, aircraft: &AircraftState, grid: &GridContext) -> u64 {
    fnv1a_hash(&format!("{tick}{aircraft:?}{grid:?}"))
}

fn fnv1a_hash(data: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in data.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}
