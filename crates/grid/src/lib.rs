//! Scrolling Grid: nested square tile grids that stay centred on a moving
//! observer by shifting coordinates and recycling edge rows and columns.
//!
//! # Invariants
//! - Tile coordinates stay within `(N + step - 1) * size / 2` of the
//!   observer on each horizontal axis.
//! - Every level except the finest hides exactly the block the next finer
//!   level covers, so the visible tiles of all levels neither overlap nor
//!   leave gaps.
//! - A frame with zero displacement changes nothing.

mod config;
mod context;
mod level;

pub use config::{GridConfig, GridError, LevelConfig};
pub use context::{GridContext, GridStats};
pub use level::{Cutout, GridLevel, OffsetDelta, Tile, WrapDirection, WrapEvent};

pub fn crate_info() -> &'static str {
    "flightdeck-grid v0.1.0"
}
