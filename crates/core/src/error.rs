//! Error taxonomy shared by every fallible operation in the crate.
//!
//! Mutating operations validate before they write, so an `Err` always means the
//! grid was left exactly as it was before the call.

use thiserror::Error;

/// Errors surfaced by the wildfire core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WildfireError {
    /// The pixel source was empty, malformed, or could not be decoded.
    /// The grid is left unmodified.
    #[error("classification input rejected: {0}")]
    ClassificationInput(String),

    /// An ignition, propagation or edit targeted a cell outside the grid.
    #[error("cell index {index} is outside the grid ({len} cells)")]
    InvalidGridReference {
        /// Requested cell index
        index: usize,
        /// Number of cells in the grid
        len: usize,
    },

    /// A weather scalar could not be parsed as a finite number.
    ///
    /// Not fatal: the value is coerced to 0 and this error is reported
    /// alongside the parsed input.
    #[error("weather field '{field}' is not a number: {raw:?}")]
    InvalidWeatherInput {
        /// Name of the weather field
        field: &'static str,
        /// The raw text that failed to parse
        raw: String,
    },

    /// A construction parameter (grid size, wind, probability) is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Description of the constraint that was violated
        reason: String,
    },
}

impl WildfireError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<image::ImageError> for WildfireError {
    fn from(err: image::ImageError) -> Self {
        Self::ClassificationInput(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, WildfireError>;
