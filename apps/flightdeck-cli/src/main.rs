mod script;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use flightdeck_common::{DisplayUnits, FlatSurface, FrameDelta};
use flightdeck_flight::{
    AircraftSpec, AircraftState, ControlMapper, Instruments, Preset, load_aircraft,
};
use flightdeck_grid::{GridConfig, GridContext};
use flightdeck_kernel::{SimEvent, Simulation, SnapshotStore};
use flightdeck_tools::SimInspector;
use glam::DVec3;
use tracing_subscriber::EnvFilter;

use script::Script;

#[derive(Parser)]
#[command(name = "flightdeck", about = "Flight model and scrolling grid driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions, presets and the default grid layout
    Info,
    /// Fly a scripted sortie and print the HUD
    Fly(FlyArgs),
    /// Scroll the grid alone along a straight track
    Scroll {
        /// Grid YAML file (default three-level grid if omitted)
        #[arg(long)]
        grid: Option<PathBuf>,
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Eastward displacement per frame (m)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        east: f64,
        /// Northward displacement per frame (m)
        #[arg(long, default_value = "-20", allow_hyphen_values = true)]
        north: f64,
        #[arg(long, default_value = "0")]
        altitude: f64,
    },
    /// Check that a sortie replays to the same state and survives rollback
    Replay(FlyArgs),
    /// Load and validate configuration files (all presets if none given)
    Validate {
        #[arg(long)]
        aircraft: Vec<PathBuf>,
        #[arg(long)]
        grid: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct FlyArgs {
    /// Built-in aircraft: fighter or biplane
    #[arg(short, long, default_value = "fighter")]
    preset: Preset,
    /// Aircraft YAML file, overrides --preset
    #[arg(long)]
    aircraft: Option<PathBuf>,
    /// Grid YAML file
    #[arg(long)]
    grid: Option<PathBuf>,
    /// Control script YAML (built-in takeoff script if omitted)
    #[arg(long)]
    script: Option<PathBuf>,
    /// Frames to run (script length if omitted)
    #[arg(short, long)]
    frames: Option<u64>,
    /// Start airborne at this altitude (m) instead of parked
    #[arg(long)]
    altitude: Option<f64>,
    /// Initial forward speed (m/s) when starting airborne
    #[arg(long, default_value = "0")]
    speed: f64,
    /// Print the HUD every N frames
    #[arg(long, default_value = "60")]
    every: u64,
    /// HUD units: mph, knots or kmh
    #[arg(long, default_value = "mph", value_parser = parse_units)]
    units: DisplayUnits,
    /// Print HUD frames as JSON lines
    #[arg(long)]
    json: bool,
}

fn parse_units(s: &str) -> Result<DisplayUnits, String> {
    match s.to_ascii_lowercase().as_str() {
        "mph" => Ok(DisplayUnits::Mph),
        "knots" | "kts" => Ok(DisplayUnits::Knots),
        "kmh" | "km/h" => Ok(DisplayUnits::Kmh),
        other => Err(format!("unknown units '{other}' (expected mph, knots or kmh)")),
    }
}

/// Everything needed to build, and rebuild, one sortie.
struct Sortie {
    spec: AircraftSpec,
    initial: AircraftState,
    grid: GridConfig,
    script: Script,
    frames: u64,
}

impl Sortie {
    fn from_args(args: &FlyArgs) -> anyhow::Result<Self> {
        let spec = match &args.aircraft {
            Some(path) => load_aircraft(path)
                .with_context(|| format!("loading aircraft {}", path.display()))?,
            None => args.preset.load()?,
        };
        let grid = match &args.grid {
            Some(path) => GridConfig::load(path)
                .with_context(|| format!("loading grid {}", path.display()))?,
            None => GridConfig::default(),
        };
        let script = match &args.script {
            Some(path) => Script::load(path)?,
            None => Script::takeoff()?,
        };
        let initial = match args.altitude {
            Some(altitude) => {
                let mut state = AircraftState::airborne(DVec3::new(0.0, altitude, 0.0), 0.0);
                state.velocity = DVec3::new(0.0, 0.0, args.speed);
                state.body_velocity.forward = args.speed;
                state.equipment.throttle = 0.5;
                state
            }
            None => AircraftState::parked(0.0, 0.0, 0.0, spec.min_agl, 0.0),
        };
        let frames = args.frames.unwrap_or_else(|| script.total_frames());
        Ok(Self {
            spec,
            initial,
            grid,
            script,
            frames,
        })
    }

    fn simulation(&self) -> anyhow::Result<Simulation> {
        Ok(Simulation::new(
            self.spec.clone(),
            self.initial,
            &self.grid,
            FlatSurface::default(),
        )?)
    }

    /// Run `frames` frames, calling `on_frame` after each.
    fn fly(
        &self,
        sim: &mut Simulation,
        mut on_frame: impl FnMut(&Simulation, u64) -> anyhow::Result<()>,
    ) -> anyhow::Result<()> {
        let mut mapper = ControlMapper::for_aircraft(&self.spec);
        for frame in 0..self.frames {
            let inputs = mapper.map(self.script.actions_at(frame));
            sim.step(&inputs);
            on_frame(sim, frame)?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => info(),
        Commands::Fly(args) => fly(&args),
        Commands::Scroll {
            grid,
            frames,
            east,
            north,
            altitude,
        } => scroll(grid, frames, east, north, altitude),
        Commands::Replay(args) => replay(&args),
        Commands::Validate { aircraft, grid } => validate(&aircraft, &grid),
    }
}

fn info() -> anyhow::Result<()> {
    println!("flightdeck v{}", env!("CARGO_PKG_VERSION"));
    println!("common: {}", flightdeck_common::crate_info());
    println!("flight: {}", flightdeck_flight::crate_info());
    println!("grid: {}", flightdeck_grid::crate_info());
    println!("kernel: {}", flightdeck_kernel::crate_info());
    println!("tools: {}", flightdeck_tools::crate_info());
    println!("\nPresets:");
    for preset in Preset::ALL {
        let spec = preset.load()?;
        println!(
            "  {preset}: {} ({:.0} kg, span {:.1} m)",
            spec.name, spec.mass, spec.wing.span
        );
    }
    println!("\nDefault grid:");
    let grid = GridContext::new(&GridConfig::default())?;
    for level in SimInspector::levels(&grid) {
        println!("  {level}");
    }
    Ok(())
}

fn fly(args: &FlyArgs) -> anyhow::Result<()> {
    let sortie = Sortie::from_args(args)?;
    let mut sim = sortie.simulation()?;
    tracing::info!(aircraft = %sortie.spec.name, frames = sortie.frames, "flying");

    let every = args.every.max(1);
    sortie.fly(&mut sim, |sim, frame| {
        if (frame + 1) % every == 0 || frame + 1 == sortie.frames {
            let hud = Instruments::read(sim.state(), args.units);
            if args.json {
                println!("{}", serde_json::to_string(&hud)?);
            } else {
                println!("[{:>6}] {hud}", sim.tick());
            }
        }
        Ok(())
    })?;

    for event in sim.events() {
        match event {
            SimEvent::Touchdown { tick, airspeed } => {
                println!("touchdown at tick {tick}, {airspeed:.1} m/s");
            }
            SimEvent::Liftoff { tick } => println!("liftoff at tick {tick}"),
            _ => {}
        }
    }
    println!("{}", SimInspector::summary(&sim));
    println!("{}", SimInspector::event_counts(sim.events()));
    Ok(())
}

fn scroll(
    grid_path: Option<PathBuf>,
    frames: u64,
    east: f64,
    north: f64,
    altitude: f64,
) -> anyhow::Result<()> {
    let config = match grid_path {
        Some(path) => GridConfig::load(&path)
            .with_context(|| format!("loading grid {}", path.display()))?,
        None => GridConfig::default(),
    };
    let mut grid = GridContext::new(&config)?;
    let delta = FrameDelta::horizontal(east, north, altitude);

    let mut wraps_per_level = vec![0usize; config.levels.len()];
    let mut total = Duration::ZERO;
    let mut slowest = Duration::ZERO;
    for frame in 1..=frames {
        let (events, stats) = grid.update_timed(&delta);
        total += stats.update_time;
        slowest = slowest.max(stats.update_time);
        for event in &events {
            wraps_per_level[event.level] += 1;
            tracing::debug!(frame, level = event.level, direction = ?event.direction, "wrap");
        }
    }

    println!("Scrolled {frames} frames at ({east}, {north}) m/frame");
    for (level, info) in SimInspector::levels(&grid).iter().enumerate() {
        println!("  {info} wraps={}", wraps_per_level[level]);
    }
    if frames > 0 {
        println!(
            "update: {:?}/frame avg, {slowest:?} max",
            total / frames as u32
        );
    }
    Ok(())
}

fn replay(args: &FlyArgs) -> anyhow::Result<()> {
    let sortie = Sortie::from_args(args)?;
    let mut sim = sortie.simulation()?;
    let mut store = SnapshotStore::new();
    let midpoint = sortie.frames / 2;

    sortie.fly(&mut sim, |sim, frame| {
        if frame + 1 == midpoint {
            store.take_snapshot(sim);
        }
        Ok(())
    })?;
    let original = sim.state_hash();
    let events = sim.events().to_vec();
    println!("Run: tick={} hash={original:016x}", sim.tick());

    let replayed = Simulation::replay(
        sortie.spec.clone(),
        sortie.initial,
        &sortie.grid,
        FlatSurface::default(),
        &events,
    )?;
    println!(
        "Replay: tick={} hash={:016x}",
        replayed.tick(),
        replayed.state_hash()
    );
    if replayed.state_hash() != original {
        bail!("replay diverged from the original run");
    }

    if store.snapshot_count() > 0 {
        store.rollback(0, &mut sim)?;
        let resume_from = sim.tick();
        for event in &events {
            if let SimEvent::Stepped { tick, controls } = event {
                if *tick > resume_from {
                    sim.step(controls);
                }
            }
        }
        println!(
            "Rollback to tick {resume_from} and resume: hash={:016x}",
            sim.state_hash()
        );
        if sim.state_hash() != original {
            bail!("resuming from the snapshot diverged from the original run");
        }
    }
    println!("Match: OK");
    Ok(())
}

fn validate(aircraft: &[PathBuf], grids: &[PathBuf]) -> anyhow::Result<()> {
    let mut failures = 0;
    if aircraft.is_empty() && grids.is_empty() {
        for preset in Preset::ALL {
            match preset.load() {
                Ok(spec) => println!("ok   preset {preset}: {}", spec.name),
                Err(e) => {
                    failures += 1;
                    println!("FAIL preset {preset}: {e}");
                }
            }
        }
        match GridConfig::default().validate() {
            Ok(()) => println!("ok   default grid"),
            Err(e) => {
                failures += 1;
                println!("FAIL default grid: {e}");
            }
        }
    }
    for path in aircraft {
        match load_aircraft(path) {
            Ok(spec) => println!("ok   {}: {}", path.display(), spec.name),
            Err(e) => {
                failures += 1;
                println!("FAIL {}: {e}", path.display());
            }
        }
    }
    for path in grids {
        match GridConfig::load(path) {
            Ok(config) => println!("ok   {}: {} levels", path.display(), config.levels.len()),
            Err(e) => {
                failures += 1;
                println!("FAIL {}: {e}", path.display());
            }
        }
    }
    if failures > 0 {
        bail!("{failures} configuration(s) failed validation");
    }
    Ok(())
}
