//! Fire-weather danger index
//!
//! Turns temperature, humidity, wind speed and precipitation into a score, a
//! discrete danger category and a fixed advisory. Independent of the grid and
//! of the spread engine.

pub mod fire_weather_index;

pub use fire_weather_index::{
    compute_index, fwi_ranges, parse_scalar, FireDangerCategory, FireWeatherIndex, ParsedWeather,
    WeatherInput,
};
