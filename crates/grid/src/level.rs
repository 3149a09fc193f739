use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::config::LevelConfig;

/// Which way the observer crossed a wrap boundary. Rows (or columns) are
/// recycled onto the edge the observer is moving toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapDirection {
    North,
    South,
    East,
    West,
}

/// Cut-out offset change in coarser-grid tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffsetDelta {
    pub north_south: i64,
    pub east_west: i64,
}

/// One recycle of `step` rows or columns on `level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapEvent {
    pub level: usize,
    pub direction: WrapDirection,
    pub step: usize,
}

impl WrapEvent {
    /// Effect on the wrapping level's own cut-out. Its anchor edge moved by
    /// `step` tiles while the hole it frames stayed put.
    pub fn own_offset_delta(&self) -> OffsetDelta {
        let k = self.step as i64;
        match self.direction {
            WrapDirection::South => OffsetDelta {
                north_south: k,
                east_west: 0,
            },
            WrapDirection::North => OffsetDelta {
                north_south: -k,
                east_west: 0,
            },
            WrapDirection::West => OffsetDelta {
                north_south: 0,
                east_west: k,
            },
            WrapDirection::East => OffsetDelta {
                north_south: 0,
                east_west: -k,
            },
        }
    }

    /// Effect on the next coarser level's cut-out: this level's footprint
    /// moved by exactly one coarser tile.
    pub fn outer_offset_delta(&self) -> OffsetDelta {
        match self.direction {
            WrapDirection::North => OffsetDelta {
                north_south: 1,
                east_west: 0,
            },
            WrapDirection::South => OffsetDelta {
                north_south: -1,
                east_west: 0,
            },
            WrapDirection::East => OffsetDelta {
                north_south: 0,
                east_west: 1,
            },
            WrapDirection::West => OffsetDelta {
                north_south: 0,
                east_west: -1,
            },
        }
    }
}

/// Block of tiles hidden because the next finer level covers them.
/// Offsets count tiles from the south/west edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cutout {
    pub size: usize,
    pub north_south_offset: i64,
    pub east_west_offset: i64,
}

impl Cutout {
    fn apply(&mut self, delta: OffsetDelta) {
        self.north_south_offset += delta.north_south;
        self.east_west_offset += delta.east_west;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Tile centre relative to the observer.
    pub position: DVec3,
    pub visible: bool,
}

/// A square ring buffer of tiles scrolled around the observer.
///
/// Row `r` sits at `north_coords[r]`, column `c` at `east_coords[c]`. The
/// buffer is circular: the row after `north_index` (mod N) is the southmost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLevel {
    index: usize,
    tile_count: usize,
    tile_size: f64,
    step: usize,
    vertical_offset: f64,
    north_coords: Vec<f64>,
    east_coords: Vec<f64>,
    north_index: usize,
    east_index: usize,
    cutout: Option<Cutout>,
    tiles: Vec<Tile>,
}

impl GridLevel {
    /// Centre level `index` on the observer and, for any level above the
    /// finest, place its cut-out over the finer level's footprint.
    /// Expects a validated configuration.
    pub fn init(index: usize, levels: &[LevelConfig], max_wave_height: f64) -> Self {
        let cfg = levels[index];
        let n = cfg.tile_count;
        let s = cfg.tile_size;
        let centre = (n as f64 - 1.0) / 2.0;
        let coords: Vec<f64> = (0..n).map(|i| (i as f64 - centre) * s).collect();
        let cutout = index.checked_sub(1).map(|inner| {
            let size = levels[inner].cutout_in_outer();
            let offset = ((n - size) / 2) as i64;
            Cutout {
                size,
                north_south_offset: offset,
                east_west_offset: offset,
            }
        });
        let vertical_offset = if index == 0 { 0.0 } else { -max_wave_height };
        let mut level = Self {
            index,
            tile_count: n,
            tile_size: s,
            step: cfg.step,
            vertical_offset,
            north_coords: coords.clone(),
            east_coords: coords,
            north_index: n - 1,
            east_index: n - 1,
            cutout,
            tiles: vec![
                Tile {
                    position: DVec3::ZERO,
                    visible: true,
                };
                n * n
            ],
        };
        level.refresh_tiles(0.0);
        level
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn north_index(&self) -> usize {
        self.north_index
    }

    pub fn east_index(&self) -> usize {
        self.east_index
    }

    pub fn south_index(&self) -> usize {
        (self.north_index + 1) % self.tile_count
    }

    pub fn west_index(&self) -> usize {
        (self.east_index + 1) % self.tile_count
    }

    pub fn north_coords(&self) -> &[f64] {
        &self.north_coords
    }

    pub fn east_coords(&self) -> &[f64] {
        &self.east_coords
    }

    pub fn cutout(&self) -> Option<&Cutout> {
        self.cutout.as_ref()
    }

    /// Row-major, `tiles[row * N + col]`.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, row: usize, col: usize) -> &Tile {
        &self.tiles[row * self.tile_count + col]
    }

    pub fn visible_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.visible)
    }

    /// Row/column centres never leave `[-bound, bound]`. Reduces to half the
    /// grid extent when one row is recycled at a time.
    pub fn wrap_bound(&self) -> f64 {
        (self.tile_count + self.step - 1) as f64 * self.tile_size / 2.0
    }

    /// Shift every coordinate by `-displacement` and recycle rows/columns
    /// that crossed the bound. Only the edge the grid is moving toward is
    /// checked, so a row sitting exactly on the bound never oscillates.
    pub fn scroll(&mut self, displacement: DVec3) -> Vec<WrapEvent> {
        for z in &mut self.north_coords {
            *z -= displacement.z;
        }
        for x in &mut self.east_coords {
            *x -= displacement.x;
        }

        let n = self.tile_count;
        let k = self.step;
        let span = n as f64 * self.tile_size;
        let bound = self.wrap_bound();
        let mut events = Vec::new();

        if displacement.z < 0.0 {
            while self.north_coords[self.north_index] >= bound {
                for i in 0..k {
                    self.north_coords[(self.north_index + n - i) % n] -= span;
                }
                self.north_index = (self.north_index + n - k) % n;
                events.push(self.event(WrapDirection::South));
            }
        } else if displacement.z > 0.0 {
            while self.north_coords[self.south_index()] <= -bound {
                let south = self.south_index();
                for i in 0..k {
                    self.north_coords[(south + i) % n] += span;
                }
                self.north_index = (self.north_index + k) % n;
                events.push(self.event(WrapDirection::North));
            }
        }

        if displacement.x < 0.0 {
            while self.east_coords[self.east_index] >= bound {
                for i in 0..k {
                    self.east_coords[(self.east_index + n - i) % n] -= span;
                }
                self.east_index = (self.east_index + n - k) % n;
                events.push(self.event(WrapDirection::West));
            }
        } else if displacement.x > 0.0 {
            while self.east_coords[self.west_index()] <= -bound {
                let west = self.west_index();
                for i in 0..k {
                    self.east_coords[(west + i) % n] += span;
                }
                self.east_index = (self.east_index + k) % n;
                events.push(self.event(WrapDirection::East));
            }
        }

        debug_assert!(self.north_index < n && self.east_index < n);
        events
    }

    fn event(&self, direction: WrapDirection) -> WrapEvent {
        WrapEvent {
            level: self.index,
            direction,
            step: self.step,
        }
    }

    pub(crate) fn apply_offset(&mut self, delta: OffsetDelta) {
        if let Some(cutout) = self.cutout.as_mut() {
            cutout.apply(delta);
            debug_assert!(
                Self::offset_in_range(cutout.north_south_offset, cutout.size, self.tile_count)
                    && Self::offset_in_range(cutout.east_west_offset, cutout.size, self.tile_count),
                "cut-out {cutout:?} left level {}",
                self.index
            );
        }
    }

    fn offset_in_range(offset: i64, size: usize, n: usize) -> bool {
        offset >= 0 && offset as usize + size <= n
    }

    /// Rebuild tile positions and visibility for the observer's altitude.
    pub fn refresh_tiles(&mut self, altitude: f64) {
        let n = self.tile_count;
        let y = -altitude + self.vertical_offset;
        for (r, &z) in self.north_coords.iter().enumerate() {
            for (c, &x) in self.east_coords.iter().enumerate() {
                self.tiles[r * n + c] = Tile {
                    position: DVec3::new(x, y, z),
                    visible: true,
                };
            }
        }
        if let Some(cutout) = self.cutout {
            let first_row = (self.south_index() as i64 + cutout.north_south_offset)
                .rem_euclid(n as i64) as usize;
            let first_col =
                (self.west_index() as i64 + cutout.east_west_offset).rem_euclid(n as i64) as usize;
            for i in 0..cutout.size {
                let r = (first_row + i) % n;
                for j in 0..cutout.size {
                    let c = (first_col + j) % n;
                    self.tiles[r * n + c].visible = false;
                }
            }
        }
    }
}
