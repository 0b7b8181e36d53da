//! Simplified fire-weather index and danger category
//!
//! ```text
//! score = max(0, T × 0.5 + (100 − RH) × 0.3 + wind × 0.15 − precipitation × 2)
//! ```
//!
//! The index is informational. It is not fed into the spread engine.

use crate::error::WildfireError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Fire-weather index threshold constants.
///
/// Note: Rust `Range` types use **inclusive lower bound and exclusive upper bound** [a, b).
pub mod fwi_ranges {
    use std::ops::{Range, RangeFrom};

    /// "Low" range `[0.0, 5.0)`
    pub const LOW: Range<f64> = 0.0..5.0;

    /// "Moderate" range `[5.0, 15.0)`
    pub const MODERATE: Range<f64> = 5.0..15.0;

    /// "High" range `[15.0, 30.0)`
    pub const HIGH: Range<f64> = 15.0..30.0;

    /// "Very High" range `[30.0, 50.0)`
    pub const VERY_HIGH: Range<f64> = 30.0..50.0;

    /// "Extreme" `[50.0, ∞)`
    pub const EXTREME: RangeFrom<f64> = 50.0..;
}

/// Weather scalars feeding the index
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherInput {
    /// Air temperature (°C)
    pub temperature: f64,
    /// Relative humidity (%, 0-100)
    pub humidity: f64,
    /// Wind speed
    pub wind_speed: f64,
    /// Accumulated precipitation
    pub precipitation: f64,
}

/// Parsed weather input along with the fields that had to be coerced to 0
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWeather {
    pub input: WeatherInput,
    /// One [`WildfireError::InvalidWeatherInput`] per rejected field
    pub rejected: Vec<WildfireError>,
}

impl WeatherInput {
    pub fn new(temperature: f64, humidity: f64, wind_speed: f64, precipitation: f64) -> Self {
        Self {
            temperature,
            humidity,
            wind_speed,
            precipitation,
        }
    }

    /// Parse four text fields as they arrive from a form.
    ///
    /// Absent or blank fields become 0. Text that is not a finite number also
    /// becomes 0 and is reported in [`ParsedWeather::rejected`]; parsing never
    /// fails outright.
    pub fn parse(
        temperature: Option<&str>,
        humidity: Option<&str>,
        wind_speed: Option<&str>,
        precipitation: Option<&str>,
    ) -> ParsedWeather {
        let mut rejected = Vec::new();
        let mut field = |name: &'static str, raw: Option<&str>| match parse_scalar(name, raw) {
            Ok(value) => value,
            Err(err) => {
                rejected.push(err);
                0.0
            }
        };
        let input = WeatherInput {
            temperature: field("temperature", temperature),
            humidity: field("humidity", humidity),
            wind_speed: field("wind_speed", wind_speed),
            precipitation: field("precipitation", precipitation),
        };
        ParsedWeather { input, rejected }
    }

    /// Compute the index for these conditions
    pub fn fire_weather_index(&self) -> FireWeatherIndex {
        compute_index(self)
    }
}

/// Parse one scalar. Absent or blank text is 0.
///
/// # Errors
/// Returns [`WildfireError::InvalidWeatherInput`] when the text is present but is
/// not a finite number.
pub fn parse_scalar(field: &'static str, raw: Option<&str>) -> Result<f64, WildfireError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(0.0);
    };
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => {
            warn!(field, raw = text, "weather input is not a number, using 0");
            Err(WildfireError::InvalidWeatherInput {
                field,
                raw: text.to_string(),
            })
        }
    }
}

/// Discrete danger category of a fire-weather index score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireDangerCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl FireDangerCategory {
    /// Category for a score; negative or NaN scores count as low
    pub fn from_score(score: f64) -> Self {
        match score {
            _ if fwi_ranges::EXTREME.contains(&score) => FireDangerCategory::Extreme,
            _ if fwi_ranges::VERY_HIGH.contains(&score) => FireDangerCategory::VeryHigh,
            _ if fwi_ranges::HIGH.contains(&score) => FireDangerCategory::High,
            _ if fwi_ranges::MODERATE.contains(&score) => FireDangerCategory::Moderate,
            _ => FireDangerCategory::Low,
        }
    }

    /// Human-readable category name
    pub fn label(self) -> &'static str {
        match self {
            FireDangerCategory::Low => "Low",
            FireDangerCategory::Moderate => "Moderate",
            FireDangerCategory::High => "High",
            FireDangerCategory::VeryHigh => "Very High",
            FireDangerCategory::Extreme => "Extreme",
        }
    }

    /// Fixed advisory text for the category
    pub fn advisory(self) -> &'static str {
        match self {
            FireDangerCategory::Low => {
                "Fires are unlikely to spread. Normal precautions with open flames."
            }
            FireDangerCategory::Moderate => {
                "Fires can start and spread slowly. Keep campfires attended and contained."
            }
            FireDangerCategory::High => {
                "Fires spread readily. Avoid burning vegetation and use machinery with care."
            }
            FireDangerCategory::VeryHigh => {
                "Fires spread quickly and are hard to control. No open burning; prepare to act."
            }
            FireDangerCategory::Extreme => {
                "Fires will be uncontrollable. Total fire ban; follow evacuation advice."
            }
        }
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        match self {
            FireDangerCategory::Low => 0,
            FireDangerCategory::Moderate => 1,
            FireDangerCategory::High => 2,
            FireDangerCategory::VeryHigh => 3,
            FireDangerCategory::Extreme => 4,
        }
    }
}

impl fmt::Display for FireDangerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of an index computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireWeatherIndex {
    /// Non-negative index score
    pub score: f64,
    pub category: FireDangerCategory,
}

impl FireWeatherIndex {
    pub fn advisory(&self) -> &'static str {
        self.category.advisory()
    }
}

/// Compute the fire-weather index score, category and advisory for `input`.
///
/// Stateless; every call recomputes from scratch.
pub fn compute_index(input: &WeatherInput) -> FireWeatherIndex {
    let raw = input.temperature * 0.5 + (100.0 - input.humidity) * 0.3 + input.wind_speed * 0.15
        - input.precipitation * 2.0;
    // f64::max discards NaN, so the score is never negative or NaN
    let score = raw.max(0.0);
    FireWeatherIndex {
        score,
        category: FireDangerCategory::from_score(score),
    }
}
