use crate::error::{with_last_error_mut, DefaultFfiError, FfiError, WildfireErrorCode};
use crate::instance::{SimulationState, WildfireInstance};
use std::ffi::CString;

/// Set the thread-local error message and code.
pub(crate) fn set_last_error(error: &impl FfiError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Record an error in thread-local storage and return its code.
#[inline]
pub(crate) fn track_error(error: &impl FfiError) -> WildfireErrorCode {
    set_last_error(error);
    error.code()
}

/// Clear the thread-local error message and code.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = WildfireErrorCode::Ok;
    });
}

/// Run `f`, turning its result into an error code and updating the
/// thread-local error state either way.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> WildfireErrorCode
where
    F: FnOnce() -> Result<(), DefaultFfiError>,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            WildfireErrorCode::Ok
        }
        Err(error) => track_error(&error),
    }
}

/// Borrow the instance behind `ptr`.
///
/// `ptr` must be null or a pointer returned by `wildfire_new` that has not been
/// destroyed.
pub(crate) fn instance_from_ptr<'a>(
    ptr: *const WildfireInstance,
) -> Result<&'a WildfireInstance, DefaultFfiError> {
    // SAFETY: non-null pointers come from `Box::into_raw` in `wildfire_new`
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultFfiError::null_pointer("ptr"))
}

/// Shared access to the simulation state
pub(crate) fn with_state<F, T>(instance: &WildfireInstance, f: F) -> Result<T, DefaultFfiError>
where
    F: FnOnce(&SimulationState) -> T,
{
    let state = instance
        .state
        .read()
        .map_err(|_| DefaultFfiError::lock_poisoned("RwLock"))?;
    Ok(f(&state))
}

/// Exclusive access to the simulation state
pub(crate) fn with_state_mut<F, T>(
    instance: &WildfireInstance,
    f: F,
) -> Result<T, DefaultFfiError>
where
    F: FnOnce(&mut SimulationState) -> T,
{
    let mut state = instance
        .state
        .write()
        .map_err(|_| DefaultFfiError::lock_poisoned("RwLock"))?;
    Ok(f(&mut state))
}
