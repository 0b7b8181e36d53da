//! Core types and utilities

pub mod surface;
pub mod units;
pub mod wind;

pub use surface::{DangerLevel, FireState, SurfaceType};
pub use units::{Degrees, Radians};
pub use wind::WindVector;
