//! Frontier-driven fire-spread orchestration
//!
//! `SimulationScheduler` owns the spread engine and a FIFO frontier of burning
//! cells whose neighbours have not been tested yet. Each [`step`] pops one cell,
//! propagates it and queues whatever it ignited, so a run is a breadth-first
//! expansion that reaches a fixed point after at most `rows * cols` steps.
//!
//! - every cell enters the frontier at most once (the `scheduled` set)
//! - cancellation is checked between steps, so a cancelled run leaves a valid
//!   partial burn
//! - edits submitted between steps are applied, in order, at the start of the
//!   next step
//!
//! [`step`]: SimulationScheduler::step

pub mod action_queue;

pub use action_queue::{EditAction, EditMode, EditQueue};

use crate::core_types::{FireState, WindVector};
use crate::error::Result;
use crate::grid::{LandscapeGrid, ResetMode};
use crate::physics::{FireSpreadEngine, SpreadConfig};
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A cell changed fire state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FireEvent {
    pub index: usize,
    pub state: FireState,
}

impl FireEvent {
    fn burning(index: usize) -> Self {
        Self {
            index,
            state: FireState::Burning,
        }
    }
}

/// Shared flag that stops a [`SimulationScheduler::run`] between steps
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Frontier exhausted; no further ignition is possible
    Settled,
    /// Stopped by a [`CancellationToken`]; the frontier may still hold cells
    Cancelled,
}

/// Counters accumulated since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    /// Frontier cells propagated
    pub steps: usize,
    /// `unburned → burning` transitions (seeds, edits and spread)
    pub ignitions: usize,
    /// Neighbour tests that consumed a random draw
    pub draws: usize,
}

/// Drives a [`FireSpreadEngine`] over a [`LandscapeGrid`]
#[derive(Debug, Default)]
pub struct SimulationScheduler {
    engine: FireSpreadEngine,
    frontier: VecDeque<usize>,
    scheduled: FxHashSet<usize>,
    stats: SimulationStats,
    edits: EditQueue,
}

impl SimulationScheduler {
    pub fn new(engine: FireSpreadEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Scheduler with a validated spread table and wind
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidParameter`] if `config` fails validation.
    pub fn with_config(config: SpreadConfig, wind: WindVector) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(FireSpreadEngine::new(config, wind)))
    }

    pub fn engine(&self) -> &FireSpreadEngine {
        &self.engine
    }

    /// Takes effect from the next propagation on
    pub fn set_wind(&mut self, wind: WindVector) {
        self.engine.set_wind(wind);
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Cells waiting to propagate
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// No queued cells and no pending edits
    pub fn is_settled(&self) -> bool {
        self.frontier.is_empty() && self.edits.pending().is_empty()
    }

    /// Ignite `seeds` and queue them for propagation.
    ///
    /// All indices are checked before any cell is touched. Seeds that are
    /// already burning are queued without producing an event; barrier seeds
    /// are ignored.
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidGridReference`] for the first
    /// out-of-range seed; nothing is ignited in that case.
    pub fn seed(&mut self, grid: &mut LandscapeGrid, seeds: &[usize]) -> Result<Vec<FireEvent>> {
        for &index in seeds {
            grid.check_index(index)?;
        }

        let mut events = Vec::new();
        for &index in seeds {
            if self.ignite_and_schedule(grid, index)? {
                events.push(FireEvent::burning(index));
            }
        }
        debug!(
            seeds = seeds.len(),
            ignited = events.len(),
            frontier = self.frontier.len(),
            "simulation seeded"
        );
        Ok(events)
    }

    /// Queue every cell that is burning but has not propagated yet
    pub fn schedule_burning(&mut self, grid: &LandscapeGrid) -> usize {
        let mut queued = 0;
        for index in grid.burning_indices() {
            if self.schedule(index) {
                queued += 1;
            }
        }
        queued
    }

    /// Queue an edit for the next step
    pub fn submit_edit(&mut self, action: EditAction) {
        self.edits.submit(action);
    }

    /// Executed edits, oldest first
    pub fn edit_history(&self) -> &[EditAction] {
        self.edits.history()
    }

    /// Apply every pending edit in submission order.
    ///
    /// An edit that is rejected (cell outside the grid, barrier painted onto a
    /// burning cell) is dropped with a warning and is not recorded in the
    /// history.
    pub fn apply_pending(&mut self, grid: &mut LandscapeGrid) -> Vec<FireEvent> {
        let mut events = Vec::new();
        for action in self.edits.take_pending() {
            match self.apply_edit(grid, action) {
                Ok(event) => {
                    events.extend(event);
                    self.edits.mark_executed(action);
                }
                Err(err) => warn!(?action, %err, "edit rejected"),
            }
        }
        events
    }

    /// Apply one edit immediately
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidGridReference`] if the target is outside
    /// the grid, or [`WildfireError::InvalidParameter`] for a barrier painted
    /// onto a burning cell. Nothing changes on error.
    pub fn apply_edit(
        &mut self,
        grid: &mut LandscapeGrid,
        action: EditAction,
    ) -> Result<Option<FireEvent>> {
        match action.mode {
            EditMode::Paint(surface) => {
                grid.set_surface(action.index, surface)?;
                Ok(None)
            }
            EditMode::Ignite => Ok(self
                .ignite_and_schedule(grid, action.index)?
                .then_some(FireEvent::burning(action.index))),
        }
    }

    /// Apply pending edits, then propagate one frontier cell.
    ///
    /// Returns the events produced, or `None` when there was nothing to do.
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidGridReference`] if the frontier refers
    /// to a cell outside `grid`, i.e. the scheduler is driven with a different
    /// grid than it was seeded with.
    pub fn step<R: Rng>(
        &mut self,
        grid: &mut LandscapeGrid,
        rng: &mut R,
    ) -> Result<Option<Vec<FireEvent>>> {
        let had_edits = !self.edits.pending().is_empty();
        let mut events = self.apply_pending(grid);

        let Some(index) = self.frontier.pop_front() else {
            return Ok(had_edits.then_some(events));
        };

        let outcome = self.engine.propagate_counted(grid, index, rng)?;
        self.stats.steps += 1;
        self.stats.draws += outcome.draws;
        self.stats.ignitions += outcome.ignited.len();
        for ignited in outcome.ignited {
            self.schedule(ignited);
            events.push(FireEvent::burning(ignited));
        }
        Ok(Some(events))
    }

    /// Step until the frontier is empty or `cancel` is set, handing every
    /// event to `sink` in the order it happened.
    ///
    /// # Errors
    /// Propagates errors from [`step`](Self::step); cells ignited before the
    /// error stay burning.
    pub fn run<R, F>(
        &mut self,
        grid: &mut LandscapeGrid,
        rng: &mut R,
        cancel: &CancellationToken,
        mut sink: F,
    ) -> Result<RunOutcome>
    where
        R: Rng,
        F: FnMut(FireEvent),
    {
        loop {
            if cancel.is_cancelled() {
                info!(
                    steps = self.stats.steps,
                    remaining = self.frontier.len(),
                    "simulation cancelled"
                );
                return Ok(RunOutcome::Cancelled);
            }
            match self.step(grid, rng)? {
                Some(events) => events.into_iter().for_each(&mut sink),
                None => {
                    info!(
                        steps = self.stats.steps,
                        ignitions = self.stats.ignitions,
                        draws = self.stats.draws,
                        burning = grid.burning_count(),
                        "simulation reached fixed point"
                    );
                    return Ok(RunOutcome::Settled);
                }
            }
        }
    }

    /// Extinguish the grid and forget all scheduling state and edits
    pub fn reset(&mut self, grid: &mut LandscapeGrid, mode: ResetMode) {
        grid.reset(mode);
        self.frontier.clear();
        self.scheduled.clear();
        self.edits.clear();
        self.stats = SimulationStats::default();
    }

    fn ignite_and_schedule(&mut self, grid: &mut LandscapeGrid, index: usize) -> Result<bool> {
        let ignited = self.engine.ignite(grid, index)?;
        if ignited {
            self.stats.ignitions += 1;
        }
        if grid.cell(index)?.is_burning() {
            self.schedule(index);
        }
        Ok(ignited)
    }

    fn schedule(&mut self, index: usize) -> bool {
        if self.scheduled.insert(index) {
            self.frontier.push_back(index);
            true
        } else {
            false
        }
    }
}

/// Ignite `seeds` on `grid` and run the default spread table under `wind` to a
/// fixed point. Cells already burning beforehand spread as well.
///
/// Returns every `unburned → burning` transition in the order it happened.
///
/// # Errors
/// Returns [`WildfireError::InvalidGridReference`] if any seed is out of range;
/// the grid is left untouched in that case.
pub fn start_simulation<R: Rng>(
    grid: &mut LandscapeGrid,
    wind: WindVector,
    seeds: &[usize],
    rng: &mut R,
) -> Result<Vec<FireEvent>> {
    let engine = FireSpreadEngine::new(SpreadConfig::default(), wind);
    let mut scheduler = SimulationScheduler::new(engine);
    scheduler.schedule_burning(grid);
    let mut events = scheduler.seed(grid, seeds)?;
    scheduler.run(grid, rng, &CancellationToken::new(), |event| events.push(event))?;
    Ok(events)
}
