use std::time::{Duration, Instant};

use flightdeck_common::FrameDelta;
use serde::{Deserialize, Serialize};

use crate::config::{GridConfig, GridError};
use crate::level::{GridLevel, WrapEvent};

/// Per-update statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct GridStats {
    pub wraps_this_frame: usize,
    pub visible_tiles: usize,
    pub update_time: Duration,
}

/// All grid levels, finest first, scrolled together each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridContext {
    levels: Vec<GridLevel>,
}

impl GridContext {
    pub fn new(config: &GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        let levels = (0..config.levels.len())
            .map(|i| GridLevel::init(i, &config.levels, config.max_wave_height))
            .collect();
        tracing::debug!(levels = config.levels.len(), "grid initialised");
        Ok(Self { levels })
    }

    pub fn levels(&self) -> &[GridLevel] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&GridLevel> {
        self.levels.get(index)
    }

    /// Scroll every level by the frame's displacement, settle cut-out
    /// offsets from the wrap events, then rebuild tiles at the new altitude.
    pub fn update(&mut self, delta: &FrameDelta) -> Vec<WrapEvent> {
        let _span = tracing::info_span!("grid_update").entered();

        let mut events = Vec::new();
        for level in &mut self.levels {
            events.extend(level.scroll(delta.displacement));
        }

        for event in &events {
            tracing::trace!(?event, "recycled tiles");
            self.levels[event.level].apply_offset(event.own_offset_delta());
            if let Some(outer) = self.levels.get_mut(event.level + 1) {
                outer.apply_offset(event.outer_offset_delta());
            }
        }

        for level in &mut self.levels {
            level.refresh_tiles(delta.altitude);
        }

        tracing::trace!(
            wraps = events.len(),
            altitude = delta.altitude,
            "grid update complete"
        );
        events
    }

    /// Same as [`update`](Self::update), also reporting timings.
    pub fn update_timed(&mut self, delta: &FrameDelta) -> (Vec<WrapEvent>, GridStats) {
        let start = Instant::now();
        let events = self.update(delta);
        let stats = GridStats {
            wraps_this_frame: events.len(),
            visible_tiles: self.visible_tile_count(),
            update_time: start.elapsed(),
        };
        (events, stats)
    }

    pub fn visible_tile_count(&self) -> usize {
        self.levels.iter().map(|l| l.visible_tiles().count()).sum()
    }
}
