//! Wind vector driving spread bias

use crate::core_types::units::{Degrees, Radians};
use crate::error::{Result, WildfireError};
use serde::{Deserialize, Serialize};

/// Wind direction and tailwind multiplier.
///
/// `direction` is compared against `atan2(dy, dx)` of the grid offset towards
/// a candidate cell, with `x` growing to the right and `y` growing downwards.
/// `effect` boosts spread towards cells lying along the direction and its
/// reciprocal damps spread against it. Values below 1 swap the two roles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    direction: Degrees,
    effect: f64,
}

impl WindVector {
    /// Create a validated wind vector. Direction is wrapped into `[0, 360)`.
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidParameter`] if `direction` is not finite,
    /// or `effect` is not a finite positive number with a finite reciprocal.
    pub fn new(direction: f64, effect: f64) -> Result<Self> {
        if !direction.is_finite() {
            return Err(WildfireError::invalid_parameter(
                "wind_direction",
                format!("must be finite, got {direction}"),
            ));
        }
        if !effect.is_finite() || effect <= 0.0 || !effect.recip().is_finite() {
            return Err(WildfireError::invalid_parameter(
                "wind_effect",
                format!("must be finite and positive, got {effect}"),
            ));
        }
        Ok(Self {
            direction: Degrees::new(direction).normalized(),
            effect,
        })
    }

    /// No directional bias: every factor evaluates to 1
    pub fn calm() -> Self {
        Self {
            direction: Degrees::new(0.0),
            effect: 1.0,
        }
    }

    pub fn direction(&self) -> Degrees {
        self.direction
    }

    pub fn direction_radians(&self) -> Radians {
        self.direction.to_radians()
    }

    pub fn effect(&self) -> f64 {
        self.effect
    }
}

impl Default for WindVector {
    fn default() -> Self {
        Self::calm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_wraps() {
        let wind = WindVector::new(450.0, 2.0).unwrap();
        assert_eq!(wind.direction(), Degrees::new(90.0));
        assert_eq!(wind.effect(), 2.0);
    }

    #[test]
    fn test_rejects_invalid_effect() {
        assert!(WindVector::new(0.0, 0.0).is_err());
        assert!(WindVector::new(0.0, -1.5).is_err());
        assert!(WindVector::new(0.0, f64::NAN).is_err());
        assert!(WindVector::new(f64::INFINITY, 1.0).is_err());
        // subnormal: 1 / effect overflows
        assert!(matches!(
            WindVector::new(0.0, 1e-310),
            Err(WildfireError::InvalidParameter { name: "wind_effect", .. })
        ));
        assert!(WindVector::new(0.0, 1e-300).is_ok());
    }

    #[test]
    fn test_effect_below_one_is_valid() {
        let wind = WindVector::new(180.0, 0.5).unwrap();
        assert_eq!(wind.effect(), 0.5);
    }

    #[test]
    fn test_default_is_calm() {
        assert_eq!(WindVector::default(), WindVector::calm());
        assert_eq!(WindVector::calm().effect(), 1.0);
    }
}
