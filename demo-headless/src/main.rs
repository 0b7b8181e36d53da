use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wildfire_core::{
    CancellationToken, GridStats, LandscapeGrid, PixelBuffer, RunOutcome, SimulationScheduler,
    SimulationStats, SpreadConfig, SurfaceType, WeatherInput, WindVector,
};

/// Wildfire spread demo over a classified terrain grid
#[derive(Parser, Debug)]
#[command(name = "wildfire-demo")]
#[command(
    about = "Classify terrain from an image and simulate wind-driven fire spread",
    long_about = None
)]
struct Args {
    /// False-color source image (PNG or JPEG); a procedural scene is used when omitted
    #[arg(long)]
    image: Option<PathBuf>,

    /// Grid rows
    #[arg(long, default_value_t = 60)]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value_t = 60)]
    cols: usize,

    /// Random seed; the same seed reproduces the same burn
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Wind direction in degrees (0 = towards +x / right, 90 = towards +y / down)
    #[arg(long, default_value_t = 0.0)]
    wind_direction: f64,

    /// Tailwind multiplier (> 0; 1 = no bias)
    #[arg(long, default_value_t = 1.5)]
    wind_effect: f64,

    /// Temperature in °C
    #[arg(short, long)]
    temperature: Option<String>,

    /// Relative humidity in %
    #[arg(long)]
    humidity: Option<String>,

    /// Wind speed
    #[arg(short, long)]
    wind_speed: Option<String>,

    /// Precipitation
    #[arg(short, long)]
    precipitation: Option<String>,

    /// Ignition point as `x,y` (repeatable; defaults to the grid centre)
    #[arg(short, long, value_parser = parse_point)]
    ignite: Vec<(usize, usize)>,

    /// JSON file with spread probabilities
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many ignitions (0 = run to the fixed point)
    #[arg(long, default_value_t = 0)]
    max_ignitions: usize,

    /// Write the final grid as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the ASCII maps
    #[arg(long)]
    no_map: bool,
}

fn parse_point(s: &str) -> Result<(usize, usize), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok((x, y))
}

#[derive(Serialize)]
struct Snapshot<'a> {
    seed: u64,
    wind: WindVector,
    outcome: &'static str,
    simulation: SimulationStats,
    grid_stats: GridStats,
    grid: &'a LandscapeGrid,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    println!("=== Wildfire Spread Demo ===\n");

    // Fire-weather index
    let parsed = WeatherInput::parse(
        args.temperature.as_deref(),
        args.humidity.as_deref(),
        args.wind_speed.as_deref(),
        args.precipitation.as_deref(),
    );
    for rejected in &parsed.rejected {
        println!("Warning: {rejected} (using 0)");
    }
    let index = parsed.input.fire_weather_index();
    println!(
        "Weather: {:.1}°C, {:.0}% RH, wind {:.1}, rain {:.1}",
        parsed.input.temperature,
        parsed.input.humidity,
        parsed.input.wind_speed,
        parsed.input.precipitation
    );
    println!("Fire danger: {} (index {:.1})", index.category, index.score);
    println!("Advisory: {}\n", index.advisory());

    // Terrain
    let mut grid = LandscapeGrid::new(args.rows, args.cols)?;
    match &args.image {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            grid.classify_image_bytes(&bytes)?;
            println!("Classified {}x{} grid from {}", args.rows, args.cols, path.display());
        }
        None => {
            grid.classify_image(&procedural_scene(args.cols * 4, args.rows * 4)?)?;
            println!("Classified {}x{} grid from procedural scene", args.rows, args.cols);
        }
    }
    print_composition(&grid.stats());

    // Spread engine
    let config = match &args.config {
        Some(path) => serde_json::from_str::<SpreadConfig>(&std::fs::read_to_string(path)?)?,
        None => SpreadConfig::default(),
    };
    let wind = WindVector::new(args.wind_direction, args.wind_effect)?;
    let mut scheduler = SimulationScheduler::with_config(config, wind)?;
    println!(
        "Wind: {:.0}° with effect {:.2}\n",
        wind.direction().value(),
        wind.effect()
    );

    let seeds = if args.ignite.is_empty() {
        vec![(args.cols / 2, args.rows / 2)]
    } else {
        args.ignite.clone()
    };
    let mut indices = Vec::with_capacity(seeds.len());
    for &(x, y) in &seeds {
        let index = grid
            .index_of(x, y)
            .ok_or_else(|| format!("ignition point ({x}, {y}) is outside the grid"))?;
        let cell = grid.cells()[index];
        if cell.is_barrier() {
            println!("Ignition at ({x}, {y}) lands on {}: no fire", cell.surface_type());
        }
        indices.push(index);
    }
    scheduler.seed(&mut grid, &indices)?;

    if !args.no_map {
        println!("Before:");
        print_map(&grid);
    }

    // Run
    let mut rng = StdRng::seed_from_u64(args.seed);
    let cancel = CancellationToken::new();
    let limit = args.max_ignitions;
    let mut ignited = 0;
    let outcome = scheduler.run(&mut grid, &mut rng, &cancel, |_| {
        ignited += 1;
        if limit > 0 && ignited >= limit {
            cancel.cancel();
        }
    })?;

    if !args.no_map {
        println!("\nAfter:");
        print_map(&grid);
    }

    let stats = scheduler.stats();
    let grid_stats = grid.stats();
    println!(
        "\n{} after {} steps",
        match outcome {
            RunOutcome::Settled => "Fire settled",
            RunOutcome::Cancelled => "Stopped early",
        },
        stats.steps
    );
    println!("Ignitions: {} ({} neighbour draws)", stats.ignitions, stats.draws);
    println!(
        "Burning: {} of {} cells ({:.1}% of all, {:.1}% of burnable)",
        grid_stats.burning_cells,
        grid_stats.total_cells,
        grid_stats.burned_fraction() * 100.0,
        grid_stats.burnable_fraction_burned() * 100.0
    );

    if let Some(path) = &args.output {
        let snapshot = Snapshot {
            seed: args.seed,
            wind,
            outcome: match outcome {
                RunOutcome::Settled => "settled",
                RunOutcome::Cancelled => "cancelled",
            },
            simulation: stats,
            grid_stats,
            grid: &grid,
        };
        std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn print_composition(stats: &GridStats) {
    for surface in SurfaceType::ALL {
        let count = stats.surface_count(surface);
        if count > 0 {
            println!(
                "  {:<9} {:>6} ({:.1}%)",
                surface.name(),
                count,
                count as f64 * 100.0 / stats.total_cells as f64
            );
        }
    }
    println!();
}

fn print_map(grid: &LandscapeGrid) {
    for row in grid.cells().chunks(grid.cols()) {
        let line: String = row
            .iter()
            .map(|cell| {
                if cell.is_burning() {
                    '*'
                } else {
                    match cell.surface_type() {
                        SurfaceType::Water => '~',
                        SurfaceType::Sand => '.',
                        SurfaceType::Forest => 'T',
                        SurfaceType::Soil => ':',
                        SurfaceType::Farmland => '=',
                        SurfaceType::Unknown => '?',
                    }
                }
            })
            .collect();
        println!("|{line}|");
    }
}

/// False-color landscape: a lake with a sandy shore, a river, forest to the
/// north, farmland strips to the south and bare soil in between.
fn procedural_scene(width: usize, height: usize) -> Result<PixelBuffer, Box<dyn Error>> {
    const WATER: [u8; 3] = [20, 40, 200];
    const SAND: [u8; 3] = [220, 200, 60];
    const FOREST: [u8; 3] = [30, 160, 40];
    const SOIL: [u8; 3] = [200, 90, 60];
    const FARMLAND: [u8; 3] = [60, 170, 160];

    let (w, h) = (width as f64, height as f64);
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let (u, v) = (x as f64 / w, y as f64 / h);
            let lake = ((u - 0.3).powi(2) + (v - 0.6).powi(2)).sqrt();
            let river = (u - (0.7 + 0.08 * (v * 12.0).sin())).abs();

            let colour = if lake < 0.12 || river < 0.015 {
                WATER
            } else if lake < 0.15 {
                SAND
            } else if v < 0.45 && (u * 17.0).sin() * (v * 13.0).cos() > -0.6 {
                FOREST
            } else if v > 0.75 && ((v * 40.0) as usize) % 3 != 0 {
                FARMLAND
            } else {
                SOIL
            };
            data.extend_from_slice(&colour);
        }
    }
    Ok(PixelBuffer::from_rgb(width, height, data)?)
}
