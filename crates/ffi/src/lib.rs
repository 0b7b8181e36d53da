//! C ABI over `wildfire-core` for external renderers.
//!
//! Every call returns a [`WildfireErrorCode`]; the message for the most recent
//! failure on the calling thread is available from
//! [`wildfire_get_last_error`]. Instances are opaque pointers created by
//! [`wildfire_new`] and released with [`wildfire_destroy`].

mod error;
mod helpers;
mod instance;
mod queries;
mod simulation;

pub use error::{wildfire_get_last_error, wildfire_get_last_error_code, WildfireErrorCode};
pub use instance::{wildfire_destroy, wildfire_new, WildfireInstance};
pub use queries::{
    wildfire_compute_danger_index, wildfire_get_burning_count, wildfire_get_cell,
    wildfire_get_dimensions, WildfireCellView, WildfireDangerIndex,
};
pub use simulation::{
    wildfire_classify_rgba, wildfire_ignite, wildfire_reset, wildfire_run, wildfire_set_surface,
    wildfire_set_wind, wildfire_step,
};
