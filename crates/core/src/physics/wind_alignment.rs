//! Wind modulation of neighbour ignition probability
//!
//! The offset `(dx, dy)` from a burning cell to a candidate neighbour is turned
//! into a bearing `atan2(dy, dx)` and compared against the wind direction:
//!
//! - separation below π/4: tailwind, factor = `effect`
//! - separation above 3π/4: headwind, factor = `1 / effect`
//! - otherwise: crosswind, factor = 1

use crate::core_types::{Radians, WindVector};
use std::f64::consts::FRAC_PI_4;

/// Upper bound of the tailwind sector
pub const TAILWIND_SECTOR: f64 = FRAC_PI_4;
/// Lower bound of the headwind sector
pub const HEADWIND_SECTOR: f64 = 3.0 * FRAC_PI_4;

/// Relationship between wind and the direction towards a neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindAlignment {
    Tailwind,
    Crosswind,
    Headwind,
}

impl WindAlignment {
    /// Classify a separation angle in `[0, π]`
    pub fn from_separation(separation: Radians) -> Self {
        if *separation < TAILWIND_SECTOR {
            WindAlignment::Tailwind
        } else if *separation > HEADWIND_SECTOR {
            WindAlignment::Headwind
        } else {
            WindAlignment::Crosswind
        }
    }
}

/// Bearing of a grid offset, `atan2(dy, dx)`
#[inline]
pub fn offset_bearing(dx: i32, dy: i32) -> Radians {
    Radians::new(f64::from(dy).atan2(f64::from(dx)))
}

/// Classify the neighbour at offset `(dx, dy)` relative to the wind
pub fn alignment(wind: &WindVector, dx: i32, dy: i32) -> WindAlignment {
    WindAlignment::from_separation(wind.direction_radians().separation(offset_bearing(dx, dy)))
}

/// Multiplier applied to the base spread probability towards `(dx, dy)`
pub fn wind_factor(wind: &WindVector, dx: i32, dy: i32) -> f64 {
    match alignment(wind, dx, dy) {
        WindAlignment::Tailwind => wind.effect(),
        WindAlignment::Headwind => 1.0 / wind.effect(),
        WindAlignment::Crosswind => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_degrees_points_along_positive_x() {
        let wind = WindVector::new(0.0, 2.0).unwrap();
        assert_eq!(alignment(&wind, 1, 0), WindAlignment::Tailwind);
        assert_eq!(alignment(&wind, -1, 0), WindAlignment::Headwind);
        assert_eq!(alignment(&wind, 0, 1), WindAlignment::Crosswind);
        assert_eq!(alignment(&wind, 0, -1), WindAlignment::Crosswind);
    }

    #[test]
    fn test_diagonal_wind_favours_diagonal() {
        let wind = WindVector::new(45.0, 2.0).unwrap();
        assert_eq!(alignment(&wind, 1, 1), WindAlignment::Tailwind);
        assert_eq!(alignment(&wind, -1, -1), WindAlignment::Headwind);
        assert_eq!(alignment(&wind, 1, -1), WindAlignment::Crosswind);
    }

    #[test]
    fn test_factor_values() {
        let wind = WindVector::new(90.0, 2.0).unwrap();
        assert_relative_eq!(wind_factor(&wind, 0, 1), 2.0);
        assert_relative_eq!(wind_factor(&wind, 0, -1), 0.5);
        assert_relative_eq!(wind_factor(&wind, 1, 0), 1.0);
    }

    #[test]
    fn test_effect_below_one_swaps_roles() {
        let wind = WindVector::new(0.0, 0.5).unwrap();
        assert_relative_eq!(wind_factor(&wind, 1, 0), 0.5);
        assert_relative_eq!(wind_factor(&wind, -1, 0), 2.0);
    }

    #[test]
    fn test_calm_wind_is_neutral() {
        let wind = WindVector::calm();
        for (dx, dy) in crate::grid::NEIGHBOR_OFFSETS {
            assert_relative_eq!(wind_factor(&wind, dx, dy), 1.0);
        }
    }

    #[test]
    fn test_direction_near_seam() {
        // 350° wind against the bearing of (-1, -1) (-135°) is 125° apart: crosswind
        let wind = WindVector::new(350.0, 3.0).unwrap();
        assert_eq!(alignment(&wind, -1, -1), WindAlignment::Crosswind);
        // and against (1, 0) only 10° apart: tailwind
        assert_eq!(alignment(&wind, 1, 0), WindAlignment::Tailwind);
    }
}
