//! Fire-spread rules: surface spread table, wind modulation and neighbour ignition

pub mod fire_spread;
pub mod wind_alignment;

pub use fire_spread::{
    FireSpreadEngine, SpreadConfig, DEFAULT_SPREAD_PROBABILITY, SPREAD_PROBABILITY_CEILING,
};
pub use wind_alignment::{alignment, offset_bearing, wind_factor, WindAlignment};
