//! Wildfire Core Library
//!
//! Turns an aerial or satellite image into a grid of terrain cells and runs a
//! stochastic, wind-aware fire-spread cellular automaton over it.
//!
//! ## Pipeline
//!
//! 1. [`PixelBuffer`] holds the decoded source image
//! 2. [`LandscapeGrid::classify_image`] center-crops it to the grid aspect ratio
//!    and labels every cell with a [`SurfaceType`] (danger level follows)
//! 3. [`SimulationScheduler`] seeds ignitions and expands the fire frontier with
//!    [`FireSpreadEngine`] until no burning cell can ignite another
//! 4. [`compute_index`] rates the weather independently of the grid
//!
//! Randomness is always injected (`rand::Rng`), so a seeded generator gives a
//! reproducible burn.

pub mod core_types;
pub mod error;
pub mod grid;
pub mod physics;
pub mod simulation;
pub mod weather;

pub use core_types::{DangerLevel, Degrees, FireState, Radians, SurfaceType, WindVector};
pub use error::{Result, WildfireError};
pub use grid::{
    classify, Cell, CropWindow, GridStats, LandscapeGrid, Neighbor, PixelBuffer, ResetMode,
};
pub use physics::{FireSpreadEngine, SpreadConfig, WindAlignment};
pub use simulation::{
    start_simulation, CancellationToken, EditAction, EditMode, FireEvent, RunOutcome,
    SimulationScheduler, SimulationStats,
};
pub use weather::{compute_index, FireDangerCategory, FireWeatherIndex, WeatherInput};
