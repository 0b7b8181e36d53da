//! End-to-end spread scenarios on small hand-built and random grids
//!
//! These pin down the behavioural guarantees of a run: barriers never burn,
//! a run terminates within `rows * cols` ignitions, a fixed seed gives a fixed
//! burn, and wind biases the spread towards the downwind side.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use wildfire_core::{
    start_simulation, CancellationToken, EditAction, FireSpreadEngine, LandscapeGrid, ResetMode,
    RunOutcome, SimulationScheduler, SpreadConfig, SurfaceType, WindVector,
};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Every uniform draw is 0.0, so any positive probability ignites
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }
    fn next_u64(&mut self) -> u64 {
        0
    }
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}

/// Every uniform draw is exactly 0.5
struct HalfRng;

impl RngCore for HalfRng {
    fn next_u32(&mut self) -> u32 {
        1 << 31
    }
    fn next_u64(&mut self) -> u64 {
        1 << 63
    }
    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0x80);
    }
}

fn random_grid(rng: &mut StdRng, rows: usize, cols: usize) -> LandscapeGrid {
    let surfaces: Vec<SurfaceType> = (0..rows * cols)
        .map(|_| SurfaceType::ALL[rng.random_range(0..SurfaceType::ALL.len())])
        .collect();
    LandscapeGrid::from_surfaces(rows, cols, &surfaces).unwrap()
}

#[test]
fn test_all_forest_burns_completely_with_zero_draws() {
    let mut grid = LandscapeGrid::filled(3, 3, SurfaceType::Forest).unwrap();
    let wind = WindVector::new(0.0, 1.0).unwrap();

    let events = start_simulation(&mut grid, wind, &[4], &mut ZeroRng).unwrap();

    assert_eq!(events.len(), 9);
    assert_eq!(events[0].index, 4);
    assert_eq!(grid.burning_count(), 9);
}

#[test]
fn test_water_ring_contains_fire() {
    let mut grid = LandscapeGrid::filled(3, 3, SurfaceType::Water).unwrap();
    grid.set_surface(4, SurfaceType::Forest).unwrap();

    let events = start_simulation(&mut grid, WindVector::calm(), &[4], &mut ZeroRng).unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(grid.burning_indices(), vec![4]);
}

#[test]
fn test_sand_firebreak_splits_forest() {
    // F F S F F
    // F F S F F
    let mut grid = LandscapeGrid::filled(2, 5, SurfaceType::Forest).unwrap();
    grid.set_surface(2, SurfaceType::Sand).unwrap();
    grid.set_surface(7, SurfaceType::Sand).unwrap();

    start_simulation(&mut grid, WindVector::calm(), &[0], &mut ZeroRng).unwrap();

    assert_eq!(grid.burning_indices(), vec![0, 1, 5, 6]);
}

#[test]
fn test_wind_drives_fire_downwind() {
    // Soil: tailwind 0.3 × 3 = 0.9 beats a 0.5 draw, crosswind 0.3 and
    // headwind 0.1 do not
    let row = || LandscapeGrid::filled(1, 7, SurfaceType::Soil).unwrap();

    let mut east = row();
    start_simulation(&mut east, WindVector::new(0.0, 3.0).unwrap(), &[3], &mut HalfRng).unwrap();
    assert_eq!(east.burning_indices(), vec![3, 4, 5, 6]);

    let mut west = row();
    start_simulation(&mut west, WindVector::new(180.0, 3.0).unwrap(), &[3], &mut HalfRng).unwrap();
    assert_eq!(west.burning_indices(), vec![0, 1, 2, 3]);

    let mut calm = row();
    start_simulation(&mut calm, WindVector::calm(), &[3], &mut HalfRng).unwrap();
    assert_eq!(calm.burning_indices(), vec![3]);
}

#[test]
fn test_barriers_never_burn_on_random_grids() {
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = random_grid(&mut rng, 24, 24);
        let wind =
            WindVector::new(rng.random_range(0.0..360.0), rng.random_range(0.5..4.0)).unwrap();
        let seeds: Vec<usize> = (0..5).map(|_| rng.random_range(0..grid.len())).collect();

        start_simulation(&mut grid, wind, &seeds, &mut rng).unwrap();

        for cell in grid.cells() {
            if cell.is_barrier() {
                assert!(!cell.is_burning(), "barrier burned with seed {seed}");
            }
        }
    }
}

#[test]
fn test_run_terminates_within_cell_count() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grid = LandscapeGrid::filled(30, 30, SurfaceType::Forest).unwrap();
    let seeds: Vec<usize> = (0..grid.len()).step_by(97).collect();

    let events = start_simulation(&mut grid, WindVector::calm(), &seeds, &mut rng).unwrap();

    assert!(events.len() <= grid.len());
    assert_eq!(events.len(), grid.burning_count());
    let mut indices: Vec<usize> = events.iter().map(|e| e.index).collect();
    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices.len(), events.len(), "a cell ignited twice");
}

#[test]
fn test_scheduler_steps_bounded_by_cell_count() {
    let mut grid = LandscapeGrid::filled(12, 12, SurfaceType::Forest).unwrap();
    let mut scheduler = SimulationScheduler::default();
    scheduler.seed(&mut grid, &[0, 143]).unwrap();

    let outcome = scheduler
        .run(&mut grid, &mut ZeroRng, &CancellationToken::new(), |_| {})
        .unwrap();

    assert_eq!(outcome, RunOutcome::Settled);
    let stats = scheduler.stats();
    assert!(stats.steps <= grid.len());
    assert_eq!(stats.ignitions, grid.len());
}

#[test]
fn test_same_seed_same_burn() {
    let burn = |seed: u64| {
        let mut rng = StdRng::seed_from_u64(7);
        let mut grid = random_grid(&mut rng, 32, 32);
        let mut rng = StdRng::seed_from_u64(seed);
        let wind = WindVector::new(135.0, 2.0).unwrap();
        let center = grid.len() / 2;
        let events = start_simulation(&mut grid, wind, &[center], &mut rng).unwrap();
        (grid.burning_indices(), events)
    };

    let (first_set, first_events) = burn(1234);
    let (second_set, second_events) = burn(1234);
    assert_eq!(first_set, second_set);
    assert_eq!(first_events, second_events);
}

#[test]
fn test_cancellation_from_sink_leaves_monotone_partial_state() {
    let mut grid = LandscapeGrid::filled(20, 20, SurfaceType::Forest).unwrap();
    let mut scheduler = SimulationScheduler::default();
    scheduler.seed(&mut grid, &[210]).unwrap();

    let cancel = CancellationToken::new();
    let observer = cancel.clone();
    let mut seen = 0;
    let outcome = scheduler
        .run(&mut grid, &mut ZeroRng, &cancel, |_| {
            seen += 1;
            if seen >= 10 {
                observer.cancel();
            }
        })
        .unwrap();

    assert_eq!(outcome, RunOutcome::Cancelled);
    let partial = grid.burning_indices();
    assert!(partial.len() > 1 && partial.len() < grid.len());

    // Resuming only adds fire
    scheduler
        .run(&mut grid, &mut ZeroRng, &CancellationToken::new(), |_| {})
        .unwrap();
    let settled = grid.burning_indices();
    assert!(partial.iter().all(|i| settled.contains(i)));
    assert_eq!(settled.len(), grid.len());
}

#[test]
fn test_edits_between_steps() {
    let mut grid = LandscapeGrid::filled(1, 6, SurfaceType::Forest).unwrap();
    let mut scheduler = SimulationScheduler::default();
    scheduler.seed(&mut grid, &[0]).unwrap();
    scheduler.step(&mut grid, &mut ZeroRng).unwrap();
    assert_eq!(grid.burning_indices(), vec![0, 1]);

    // Cut a firebreak ahead of the front and light the far end
    scheduler.submit_edit(EditAction::paint(2, SurfaceType::Water));
    scheduler.submit_edit(EditAction::ignite(5));
    scheduler
        .run(&mut grid, &mut ZeroRng, &CancellationToken::new(), |_| {})
        .unwrap();

    assert_eq!(grid.burning_indices(), vec![0, 1, 3, 4, 5]);
    assert_eq!(scheduler.edit_history().len(), 2);
}

#[test]
fn test_reset_then_rerun_reproduces_burn() {
    let mut rng = StdRng::seed_from_u64(99);
    let template = random_grid(&mut rng, 16, 16);
    let wind = WindVector::new(270.0, 2.5).unwrap();
    let engine = FireSpreadEngine::new(SpreadConfig::default(), wind);
    let mut scheduler = SimulationScheduler::new(engine);

    let mut grid = template.clone();
    let mut rng = StdRng::seed_from_u64(5);
    scheduler.seed(&mut grid, &[120]).unwrap();
    scheduler
        .run(&mut grid, &mut rng, &CancellationToken::new(), |_| {})
        .unwrap();
    let first = grid.burning_indices();

    scheduler.reset(&mut grid, ResetMode::KeepSurface);
    assert_eq!(grid, template);

    let mut rng = StdRng::seed_from_u64(5);
    scheduler.seed(&mut grid, &[120]).unwrap();
    scheduler
        .run(&mut grid, &mut rng, &CancellationToken::new(), |_| {})
        .unwrap();
    assert_eq!(grid.burning_indices(), first);
}
