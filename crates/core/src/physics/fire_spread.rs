//! Stochastic, wind-modulated neighbour ignition
//!
//! For every burning cell, each of its up to 8 neighbours is tested once:
//!
//! 1. barrier or already-burning neighbours are skipped (no random draw)
//! 2. `base` comes from the surface spread table (fallback for missing types)
//! 3. `p = min(ceiling, base × wind_factor)`
//! 4. one uniform draw in `[0, 1)` ignites the neighbour when `draw < p`
//!
//! Only this module changes a cell's fire state.

use crate::core_types::{FireState, SurfaceType, WindVector};
use crate::error::{Result, WildfireError};
use crate::grid::LandscapeGrid;
use crate::physics::wind_alignment::wind_factor;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Probability used for surface types missing from the table
pub const DEFAULT_SPREAD_PROBABILITY: f64 = 0.5;
/// Hard ceiling that keeps every ignition stochastic
pub const SPREAD_PROBABILITY_CEILING: f64 = 0.95;

/// Tunable spread probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Base ignition probability per surface type
    pub probabilities: FxHashMap<SurfaceType, f64>,
    /// Used when a surface type is missing from `probabilities`
    pub fallback_probability: f64,
    /// Upper bound after wind modulation
    pub probability_ceiling: f64,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        let probabilities = [
            (SurfaceType::Water, 0.0),
            (SurfaceType::Sand, 0.0),
            (SurfaceType::Forest, 0.9),
            (SurfaceType::Soil, 0.3),
            (SurfaceType::Farmland, 0.2),
            (SurfaceType::Unknown, 0.5),
        ]
        .into_iter()
        .collect();
        Self {
            probabilities,
            fallback_probability: DEFAULT_SPREAD_PROBABILITY,
            probability_ceiling: SPREAD_PROBABILITY_CEILING,
        }
    }
}

impl SpreadConfig {
    /// Check that every probability lies in `[0, 1]`
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidParameter`] naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.fallback_probability) {
            return Err(WildfireError::invalid_parameter(
                "fallback_probability",
                format!("must be within [0, 1], got {}", self.fallback_probability),
            ));
        }
        if !in_unit(self.probability_ceiling) {
            return Err(WildfireError::invalid_parameter(
                "probability_ceiling",
                format!("must be within [0, 1], got {}", self.probability_ceiling),
            ));
        }
        for surface in SurfaceType::ALL {
            if let Some(&p) = self.probabilities.get(&surface) {
                if !in_unit(p) {
                    return Err(WildfireError::invalid_parameter(
                        "probabilities",
                        format!("{surface} must be within [0, 1], got {p}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Base probability for a surface type before wind modulation
    pub fn base_probability(&self, surface: SurfaceType) -> f64 {
        self.probabilities
            .get(&surface)
            .copied()
            .unwrap_or(self.fallback_probability)
    }

    /// Override one entry of the table
    pub fn with_probability(mut self, surface: SurfaceType, probability: f64) -> Self {
        self.probabilities.insert(surface, probability);
        self
    }
}

/// Fire-spread cellular automaton rules
#[derive(Debug, Clone, PartialEq)]
pub struct FireSpreadEngine {
    config: SpreadConfig,
    wind: WindVector,
}

impl Default for FireSpreadEngine {
    fn default() -> Self {
        Self::new(SpreadConfig::default(), WindVector::calm())
    }
}

impl FireSpreadEngine {
    pub fn new(config: SpreadConfig, wind: WindVector) -> Self {
        Self { config, wind }
    }

    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    pub fn wind(&self) -> WindVector {
        self.wind
    }

    pub fn set_wind(&mut self, wind: WindVector) {
        self.wind = wind;
    }

    /// Probability that fire crosses into a cell of `surface` reached by the
    /// offset `(dx, dy)`. Barriers are always 0.
    pub fn ignition_probability(&self, surface: SurfaceType, dx: i32, dy: i32) -> f64 {
        if surface.is_barrier() {
            return 0.0;
        }
        let base = self.config.base_probability(surface);
        if base <= 0.0 {
            return 0.0;
        }
        (base * wind_factor(&self.wind, dx, dy)).min(self.config.probability_ceiling)
    }

    /// Force `unburned → burning`. Returns whether the cell changed; barriers
    /// and burning cells are left as they are.
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidGridReference`] if `index` is out of range.
    pub fn ignite(&self, grid: &mut LandscapeGrid, index: usize) -> Result<bool> {
        grid.check_index(index)?;
        let ignited = grid.mark_burning(index);
        trace!(index, ignited, "ignition requested");
        Ok(ignited)
    }

    /// Test every eligible neighbour of `index` once and ignite the ones whose
    /// draw falls below their probability.
    ///
    /// Returns the newly ignited neighbours in neighbour scan order. A source
    /// that is not burning spreads nothing and consumes no draws.
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidGridReference`] if `index` is out of range.
    pub fn propagate<R: Rng>(
        &self,
        grid: &mut LandscapeGrid,
        index: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        Ok(self.propagate_counted(grid, index, rng)?.ignited)
    }

    pub(crate) fn propagate_counted<R: Rng>(
        &self,
        grid: &mut LandscapeGrid,
        index: usize,
        rng: &mut R,
    ) -> Result<Propagation> {
        let source = *grid.cell(index)?;
        let mut outcome = Propagation::default();
        if source.is_barrier() || !source.is_burning() {
            return Ok(outcome);
        }

        let neighbors: Vec<_> = grid.neighbors(index).collect();
        for neighbor in neighbors {
            let cell = grid.cells()[neighbor.index];
            if cell.is_barrier() || cell.fire_state() == FireState::Burning {
                continue;
            }
            let probability =
                self.ignition_probability(cell.surface_type(), neighbor.dx, neighbor.dy);
            let draw: f64 = rng.random();
            outcome.draws += 1;
            if draw < probability && grid.mark_burning(neighbor.index) {
                trace!(from = index, to = neighbor.index, probability, "fire spread");
                outcome.ignited.push(neighbor.index);
            }
        }
        Ok(outcome)
    }
}

/// Neighbours ignited by one propagation call and the number of draws taken
#[derive(Debug, Default)]
pub(crate) struct Propagation {
    pub(crate) ignited: Vec<usize>,
    pub(crate) draws: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    /// Random source whose every draw is 0.0
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

    #[test]
    fn test_default_table() {
        let config = SpreadConfig::default();
        assert_eq!(config.base_probability(SurfaceType::Water), 0.0);
        assert_eq!(config.base_probability(SurfaceType::Sand), 0.0);
        assert_eq!(config.base_probability(SurfaceType::Forest), 0.9);
        assert_eq!(config.base_probability(SurfaceType::Soil), 0.3);
        assert_eq!(config.base_probability(SurfaceType::Farmland), 0.2);
        assert_eq!(config.base_probability(SurfaceType::Unknown), 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_surface_falls_back() {
        let mut config = SpreadConfig::default();
        config.probabilities.remove(&SurfaceType::Soil);
        assert_eq!(config.base_probability(SurfaceType::Soil), 0.5);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = SpreadConfig::default().with_probability(SurfaceType::Forest, 1.5);
        assert!(matches!(
            config.validate(),
            Err(WildfireError::InvalidParameter { name: "probabilities", .. })
        ));
    }

    #[test]
    fn test_wind_alignment_probabilities() {
        let wind = WindVector::new(0.0, 2.0).unwrap();
        let engine = FireSpreadEngine::new(SpreadConfig::default(), wind);

        // Downwind: min(0.95, 0.3 × 2)
        assert_relative_eq!(engine.ignition_probability(SurfaceType::Soil, 1, 0), 0.6);
        // Upwind: min(0.95, 0.3 × 0.5)
        assert_relative_eq!(engine.ignition_probability(SurfaceType::Soil, -1, 0), 0.15);
        // Forest downwind hits the ceiling
        assert_relative_eq!(engine.ignition_probability(SurfaceType::Forest, 1, 0), 0.95);
        assert_relative_eq!(engine.ignition_probability(SurfaceType::Forest, -1, 0), 0.45);
        // Crosswind keeps the base
        assert_relative_eq!(engine.ignition_probability(SurfaceType::Farmland, 0, 1), 0.2);
    }

    #[test]
    fn test_barrier_probability_is_zero_even_if_configured() {
        let config = SpreadConfig::default().with_probability(SurfaceType::Water, 1.0);
        let engine = FireSpreadEngine::new(config, WindVector::new(0.0, 5.0).unwrap());
        assert_eq!(engine.ignition_probability(SurfaceType::Water, 1, 0), 0.0);
    }

    #[test]
    fn test_ignite_rules() {
        let engine = FireSpreadEngine::default();
        let surfaces = [SurfaceType::Forest, SurfaceType::Water];
        let mut grid = LandscapeGrid::from_surfaces(1, 2, &surfaces).unwrap();

        assert_eq!(engine.ignite(&mut grid, 0), Ok(true));
        assert_eq!(engine.ignite(&mut grid, 0), Ok(false));
        assert_eq!(engine.ignite(&mut grid, 1), Ok(false));
        assert_eq!(
            engine.ignite(&mut grid, 2),
            Err(WildfireError::InvalidGridReference { index: 2, len: 2 })
        );
        assert_eq!(grid.burning_indices(), vec![0]);
    }

    #[test]
    fn test_propagate_with_zero_draws_ignites_all_eligible() {
        let engine = FireSpreadEngine::default();
        let mut grid = LandscapeGrid::filled(3, 3, SurfaceType::Forest).unwrap();
        grid.set_surface(0, SurfaceType::Sand).unwrap();
        engine.ignite(&mut grid, 4).unwrap();

        let outcome = engine.propagate_counted(&mut grid, 4, &mut ZeroRng).unwrap();
        assert_eq!(outcome.ignited, vec![1, 2, 3, 5, 6, 7, 8]);
        // the sand cell costs no draw
        assert_eq!(outcome.draws, 7);
        assert!(!grid.cell(0).unwrap().is_burning());
    }

    #[test]
    fn test_propagate_skips_burning_neighbors() {
        let engine = FireSpreadEngine::default();
        let mut grid = LandscapeGrid::filled(1, 3, SurfaceType::Forest).unwrap();
        engine.ignite(&mut grid, 0).unwrap();
        engine.ignite(&mut grid, 1).unwrap();

        let outcome = engine.propagate_counted(&mut grid, 1, &mut ZeroRng).unwrap();
        assert_eq!(outcome.ignited, vec![2]);
        assert_eq!(outcome.draws, 1);
    }

    #[test]
    fn test_propagate_from_barrier_is_noop() {
        let engine = FireSpreadEngine::default();
        let mut grid = LandscapeGrid::filled(3, 3, SurfaceType::Forest).unwrap();
        grid.set_surface(4, SurfaceType::Water).unwrap();
        let ignited = engine.propagate(&mut grid, 4, &mut ZeroRng).unwrap();
        assert!(ignited.is_empty());
        assert_eq!(grid.burning_count(), 0);
    }

    #[test]
    fn test_propagate_from_unburned_cell_is_noop() {
        let engine = FireSpreadEngine::default();
        let mut grid = LandscapeGrid::filled(3, 3, SurfaceType::Forest).unwrap();

        let outcome = engine.propagate_counted(&mut grid, 4, &mut ZeroRng).unwrap();
        assert!(outcome.ignited.is_empty());
        assert_eq!(outcome.draws, 0);
        assert_eq!(engine.propagate(&mut grid, 4, &mut ZeroRng), Ok(Vec::new()));
        assert_eq!(grid.burning_count(), 0);
    }

    #[test]
    fn test_zero_base_stays_zero_under_extreme_wind() {
        let config = SpreadConfig::default().with_probability(SurfaceType::Soil, 0.0);
        let engine = FireSpreadEngine::new(config, WindVector::new(0.0, 1e-300).unwrap());
        assert_eq!(engine.ignition_probability(SurfaceType::Soil, -1, 0), 0.0);
        assert_eq!(engine.ignition_probability(SurfaceType::Soil, 1, 0), 0.0);

        let mut grid = LandscapeGrid::filled(1, 2, SurfaceType::Soil).unwrap();
        engine.ignite(&mut grid, 1).unwrap();
        assert!(engine.propagate(&mut grid, 1, &mut ZeroRng).unwrap().is_empty());
    }

    #[test]
    fn test_propagate_out_of_range() {
        let engine = FireSpreadEngine::default();
        let mut grid = LandscapeGrid::filled(2, 2, SurfaceType::Forest).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(
            engine.propagate(&mut grid, 4, &mut rng),
            Err(WildfireError::InvalidGridReference { index: 4, len: 4 })
        ));
    }
}
