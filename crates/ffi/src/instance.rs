use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ptr;
use std::sync::RwLock;
use tracing::debug;
use wildfire_core::{LandscapeGrid, SimulationScheduler};

use crate::error::{DefaultFfiError, WildfireErrorCode};
use crate::helpers::{clear_last_error, track_error};

/// Grid, scheduler and random source of one simulation
pub(crate) struct SimulationState {
    pub(crate) grid: LandscapeGrid,
    pub(crate) scheduler: SimulationScheduler,
    pub(crate) rng: StdRng,
}

/// The wildfire simulation context handed to the renderer as an opaque pointer.
///
/// # Thread Safety
/// The state is protected by an `RwLock`:
/// - cell queries and danger lookups take a shared `.read()` lock
/// - classification, edits and stepping take an exclusive `.write()` lock
///
/// A renderer may poll cells from its draw thread while a worker thread steps
/// the simulation.
///
/// ## Example
/// ```cpp
/// WildfireInstance* sim = nullptr;
/// if (wildfire_new(60, 60, 42, &sim) != WildfireErrorCode::Ok) {
///     return;
/// }
/// wildfire_classify_rgba(sim, pixels, width, height);
/// wildfire_ignite(sim, 30 * 60 + 30);
///
/// // once per frame
/// uintptr_t ignited = 0;
/// bool active = false;
/// wildfire_step(sim, &ignited, &active);
///
/// wildfire_destroy(sim);
/// ```
pub struct WildfireInstance {
    pub(crate) state: RwLock<SimulationState>,
}

impl WildfireInstance {
    /// Creates an instance with an all-`unknown` grid, calm wind and the
    /// default spread table.
    ///
    /// # Errors
    ///
    /// Returns `WildfireErrorCode::InvalidParameter` if either dimension is zero.
    pub(crate) fn new(rows: usize, cols: usize, seed: u64) -> Result<Self, DefaultFfiError> {
        let grid = LandscapeGrid::new(rows, cols)?;
        debug!(rows, cols, seed, "wildfire instance created");
        Ok(Self {
            state: RwLock::new(SimulationState {
                grid,
                scheduler: SimulationScheduler::default(),
                rng: StdRng::seed_from_u64(seed),
            }),
        })
    }
}

/// Create a new simulation with a `rows × cols` grid.
///
/// `seed` fixes the random source, so the same inputs reproduce the same burn.
///
/// Returns
/// - `WildfireErrorCode::Ok` with `*out_instance` set on success
/// - `WildfireErrorCode::NullPointer` if `out_instance` is null
/// - `WildfireErrorCode::InvalidParameter` if `rows` or `cols` is zero; `*out_instance`
///   is set to null
///
/// # Safety
/// `out_instance` must be null or valid for writing a pointer.
#[no_mangle]
pub unsafe extern "C" fn wildfire_new(
    rows: usize,
    cols: usize,
    seed: u64,
    out_instance: *mut *mut WildfireInstance,
) -> WildfireErrorCode {
    if out_instance.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_instance"));
    }

    match WildfireInstance::new(rows, cols, seed) {
        Ok(instance) => {
            unsafe {
                *out_instance = Box::into_raw(Box::new(instance));
            }
            clear_last_error();
            WildfireErrorCode::Ok
        }
        Err(error) => {
            unsafe {
                // Set to null on error (per documentation contract)
                *out_instance = ptr::null_mut();
            }
            track_error(&error)
        }
    }
}

/// Destroy an instance created by `wildfire_new`. Null is ignored.
///
/// # Safety
/// `ptr` must be null or a pointer returned by `wildfire_new` that has not
/// been destroyed yet.
#[no_mangle]
pub unsafe extern "C" fn wildfire_destroy(ptr: *mut WildfireInstance) {
    if ptr.is_null() {
        return;
    }

    // SAFETY: the pointer was created by `Box::into_raw` in `wildfire_new` and
    // has not been freed; taking it back runs the destructor.
    unsafe {
        drop(Box::from_raw(ptr));
    }
}
