//! Developer Tooling: simulation summary, grid level layout, event tallies.
//!
//! # Invariants
//! - Tools only read; nothing here mutates a simulation.

mod inspector;

pub use inspector::{EventCounts, LevelInfo, SimInspector, SimSummary};

pub fn crate_info() -> &'static str {
    "flightdeck-tools v0.1.0"
}
