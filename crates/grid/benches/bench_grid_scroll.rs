use std::hint::black_box;
use std::time::Instant;

use flightdeck_common::FrameDelta;
use flightdeck_grid::{GridConfig, GridContext, LevelConfig};

fn bench_update(name: &str, config: &GridConfig, speed: f64, iterations: usize) {
    let mut grid = match GridContext::new(config) {
        Ok(grid) => grid,
        Err(e) => {
            println!("  {name}: invalid config: {e}");
            return;
        }
    };
    let delta = FrameDelta::horizontal(speed * 0.6, -speed * 0.8, 300.0);

    let start = Instant::now();
    let mut wraps = 0;
    for _ in 0..iterations {
        wraps += black_box(grid.update(black_box(&delta))).len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  {name} ({speed} m/frame, {iterations} iters): {per_iter:?}/iter, {wraps} wraps, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Grid Scroll Benchmarks ===\n");

    let default = GridConfig::default();
    let dense = GridConfig {
        levels: vec![
            LevelConfig::new(64, 25.0, 4),
            LevelConfig::new(64, 100.0, 4),
            LevelConfig::new(64, 400.0, 1),
        ],
        max_wave_height: 2.0,
    };

    println!("Default three-level grid:");
    bench_update("default", &default, 0.0, 10000);
    bench_update("default", &default, 2.0, 10000);
    bench_update("default", &default, 40.0, 10000);

    println!("\nDense 64x64 levels:");
    bench_update("dense", &dense, 2.0, 1000);
    bench_update("dense", &dense, 40.0, 1000);

    println!("\n=== Done ===");
}
