use std::slice;
use wildfire_core::{
    CancellationToken, EditAction, PixelBuffer, ResetMode, SurfaceType, WildfireError, WindVector,
};

use crate::error::{DefaultFfiError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_state_mut};
use crate::instance::WildfireInstance;

/// Reclassify every cell from a tightly packed RGBA image.
///
/// The image is center-cropped to the grid's aspect ratio and sampled once per
/// cell. Fire state is left unchanged.
///
/// Returns
/// - `WildfireErrorCode::Ok` on success
/// - `WildfireErrorCode::NullPointer` if `ptr` or `data` is null
/// - `WildfireErrorCode::ClassificationInput` for zero dimensions; the grid is unchanged
///
/// # Safety
/// `data` must point to at least `width * height * 4` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn wildfire_classify_rgba(
    ptr: *const WildfireInstance,
    data: *const u8,
    width: usize,
    height: usize,
) -> WildfireErrorCode {
    if data.is_null() {
        return track_error(&DefaultFfiError::null_pointer("data"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                DefaultFfiError::invalid_parameter(format!(
                    "image dimensions {width}x{height} overflow"
                ))
            })?;
        // SAFETY: caller guarantees `data` covers `width * height * 4` bytes
        let pixels = unsafe { slice::from_raw_parts(data, len) }.to_vec();
        let source = PixelBuffer::from_rgba(width, height, pixels)?;

        with_state_mut(instance, |state| state.grid.classify_image(&source))??;
        Ok(())
    })
}

/// Paint one cell with a surface type (0 water, 1 sand, 2 forest, 3 soil,
/// 4 farmland, 5 unknown). Danger level follows; fire state is untouched.
///
/// Returns
/// - `WildfireErrorCode::InvalidParameter` for an unknown surface code, or for
///   water or sand painted onto a burning cell (the cell is left as it was)
/// - `WildfireErrorCode::InvalidGridReference` if `index` is outside the grid
#[no_mangle]
pub extern "C" fn wildfire_set_surface(
    ptr: *const WildfireInstance,
    index: usize,
    surface: u8,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let surface = SurfaceType::from_u8(surface).ok_or_else(|| {
            DefaultFfiError::invalid_parameter(format!("unknown surface code {surface}"))
        })?;

        with_state_mut(instance, |state| {
            state
                .scheduler
                .apply_edit(&mut state.grid, EditAction::paint(index, surface))
        })??;
        Ok(())
    })
}

/// Set the wind used from the next propagation on.
///
/// `direction_deg` is measured from the +x axis towards +y (grid rows grow
/// downwards); `effect` must be finite and positive. Values below 1 make fire
/// favour the upwind side.
#[no_mangle]
pub extern "C" fn wildfire_set_wind(
    ptr: *const WildfireInstance,
    direction_deg: f64,
    effect: f64,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let wind = WindVector::new(direction_deg, effect)?;
        with_state_mut(instance, |state| state.scheduler.set_wind(wind))?;
        Ok(())
    })
}

/// Ignite one cell and queue it for propagation. Barrier and already
/// burning cells are left as they are.
///
/// Returns `WildfireErrorCode::InvalidGridReference` if `index` is outside the grid.
#[no_mangle]
pub extern "C" fn wildfire_ignite(ptr: *const WildfireInstance, index: usize) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_state_mut(instance, |state| {
            state
                .scheduler
                .apply_edit(&mut state.grid, EditAction::ignite(index))
        })??;
        Ok(())
    })
}

/// Propagate one frontier cell. Call once per frame to animate the spread.
///
/// - `out_ignited` (optional) receives the number of cells ignited by this step
/// - `out_active` (optional) receives `false` once the fire has reached its
///   fixed point
///
/// # Safety
/// Non-null output pointers must be valid for writing.
#[no_mangle]
pub unsafe extern "C" fn wildfire_step(
    ptr: *const WildfireInstance,
    out_ignited: *mut usize,
    out_active: *mut bool,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let (ignited, active) = with_state_mut(instance, |state| {
            let events = state.scheduler.step(&mut state.grid, &mut state.rng)?;
            let ignited = events.as_ref().map_or(0, Vec::len);
            Ok::<_, WildfireError>((ignited, !state.scheduler.is_settled()))
        })??;

        unsafe {
            if !out_ignited.is_null() {
                *out_ignited = ignited;
            }
            if !out_active.is_null() {
                *out_active = active;
            }
        }
        Ok(())
    })
}

/// Run the spread to its fixed point.
///
/// `out_ignited` (optional) receives the number of cells ignited by the run.
///
/// # Safety
/// A non-null `out_ignited` must be valid for writing.
#[no_mangle]
pub unsafe extern "C" fn wildfire_run(
    ptr: *const WildfireInstance,
    out_ignited: *mut usize,
) -> WildfireErrorCode {
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let ignited = with_state_mut(instance, |state| {
            let mut ignited: usize = 0;
            state.scheduler.run(
                &mut state.grid,
                &mut state.rng,
                &CancellationToken::new(),
                |_| ignited += 1,
            )?;
            Ok::<_, WildfireError>(ignited)
        })??;

        if !out_ignited.is_null() {
            unsafe {
                *out_ignited = ignited;
            }
        }
        Ok(())
    })
}

/// Extinguish every cell and drop queued work and edits.
///
/// With `clear_surface` the terrain is forgotten as well (all `unknown`).
#[no_mangle]
pub extern "C" fn wildfire_reset(
    ptr: *const WildfireInstance,
    clear_surface: bool,
) -> WildfireErrorCode {
    let mode = if clear_surface {
        ResetMode::ClearSurface
    } else {
        ResetMode::KeepSurface
    };
    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        with_state_mut(instance, |state| {
            state.scheduler.reset(&mut state.grid, mode);
        })?;
        Ok(())
    })
}
