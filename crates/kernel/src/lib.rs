//! Simulation Kernel: the per-frame loop that drives flight dynamics and
//! scrolls the grid, with deterministic replay and snapshot rollback.
//!
//! # Invariants
//! - Within a frame, flight runs before the grid; the grid never sees a
//!   partially updated aircraft.
//! - The same initial state and `Stepped` controls reproduce the same
//!   `state_hash`.
//! - All state mutations flow through `step` or a verified snapshot restore.

pub mod simulation;
pub mod snapshot;

pub use simulation::{FrameReport, SimError, SimEvent, Simulation};
pub use snapshot::{Snapshot, SnapshotError, SnapshotStore};

pub fn crate_info() -> &'static str {
    "flightdeck-kernel v0.1.0"
}
