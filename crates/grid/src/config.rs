use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from grid configuration.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("grid needs at least one level")]
    NoLevels,
    #[error("level {level}: tile_count must be a positive even number, got {tile_count}")]
    BadTileCount { level: usize, tile_count: usize },
    #[error("level {level}: tile_size must be positive, got {tile_size}")]
    BadTileSize { level: usize, tile_size: f64 },
    #[error("level {level}: step {step} must be at least 1 and divide tile_count {tile_count}")]
    BadStep {
        level: usize,
        step: usize,
        tile_count: usize,
    },
    #[error(
        "level {level}: tile_size {tile_size} x step {step} must equal the next level's tile_size {outer_tile_size}"
    )]
    StepMismatch {
        level: usize,
        tile_size: f64,
        step: usize,
        outer_tile_size: f64,
    },
    #[error("level {level}: tile_count {tile_count} must be a multiple of 2 x step {step}")]
    Misaligned {
        level: usize,
        tile_count: usize,
        step: usize,
    },
    #[error(
        "level {level}: cut-out of {cutout} tiles does not fit centred in {tile_count} tiles with step {step}"
    )]
    CutoutTooLarge {
        level: usize,
        cutout: usize,
        tile_count: usize,
        step: usize,
    },
}

/// One resolution tier as configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Tiles per side.
    pub tile_count: usize,
    /// World units per tile edge.
    pub tile_size: f64,
    /// Rows/columns recycled per wrap. For every level but the coarsest this
    /// is the tile-size ratio to the next level.
    #[serde(default = "default_step")]
    pub step: usize,
}

fn default_step() -> usize {
    1
}

impl LevelConfig {
    pub fn new(tile_count: usize, tile_size: f64, step: usize) -> Self {
        Self {
            tile_count,
            tile_size,
            step,
        }
    }

    /// Tiles of the next coarser level covered by this level's footprint.
    pub fn cutout_in_outer(&self) -> usize {
        self.tile_count / self.step
    }
}

/// Nested grid levels, finest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub levels: Vec<LevelConfig>,
    /// Outer levels sit this far below the finest to stay under wave crests.
    #[serde(default)]
    pub max_wave_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig::new(16, 100.0, 4),
                LevelConfig::new(16, 400.0, 4),
                LevelConfig::new(16, 1600.0, 1),
            ],
            max_wave_height: 2.0,
        }
    }
}

impl GridConfig {
    /// A single-level grid.
    pub fn single(tile_count: usize, tile_size: f64) -> Self {
        Self {
            levels: vec![LevelConfig::new(tile_count, tile_size, 1)],
            max_wave_height: 0.0,
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, GridError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&text)
    }

    /// Check the nesting preconditions: every finer footprint lands on the
    /// coarser tile lattice and stays inside the coarser grid while scrolling.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.levels.is_empty() {
            return Err(GridError::NoLevels);
        }
        for (level, cfg) in self.levels.iter().enumerate() {
            if cfg.tile_count == 0 || cfg.tile_count % 2 != 0 {
                return Err(GridError::BadTileCount {
                    level,
                    tile_count: cfg.tile_count,
                });
            }
            if !(cfg.tile_size > 0.0 && cfg.tile_size.is_finite()) {
                return Err(GridError::BadTileSize {
                    level,
                    tile_size: cfg.tile_size,
                });
            }
            if cfg.step == 0 || cfg.tile_count % cfg.step != 0 {
                return Err(GridError::BadStep {
                    level,
                    step: cfg.step,
                    tile_count: cfg.tile_count,
                });
            }
        }
        for (level, pair) in self.levels.windows(2).enumerate() {
            let (inner, outer) = (&pair[0], &pair[1]);
            let stepped = inner.tile_size * inner.step as f64;
            if (stepped - outer.tile_size).abs() > 1e-9 * outer.tile_size {
                return Err(GridError::StepMismatch {
                    level,
                    tile_size: inner.tile_size,
                    step: inner.step,
                    outer_tile_size: outer.tile_size,
                });
            }
            if inner.tile_count % (2 * inner.step) != 0 {
                return Err(GridError::Misaligned {
                    level,
                    tile_count: inner.tile_count,
                    step: inner.step,
                });
            }
            let cutout = inner.cutout_in_outer();
            let margin = outer.tile_count.saturating_sub(cutout);
            if cutout >= outer.tile_count || margin % 2 != 0 || margin < outer.step + 1 {
                return Err(GridError::CutoutTooLarge {
                    level: level + 1,
                    cutout,
                    tile_count: outer.tile_count,
                    step: outer.step,
                });
            }
        }
        Ok(())
    }
}
