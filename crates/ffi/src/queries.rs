use wildfire_core::{compute_index, Cell, FireWeatherIndex, WeatherInput, WildfireError};

use crate::error::{DefaultFfiError, WildfireErrorCode};
use crate::helpers::{handle_ffi_result_error, instance_from_ptr, track_error, with_state};
use crate::instance::WildfireInstance;

/// FFI-friendly view of one grid cell.
/// Keep this layout stable for C/C++/C# consumers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WildfireCellView {
    /// 0 water, 1 sand, 2 forest, 3 soil, 4 farmland, 5 unknown
    pub surface_type: u8,
    /// 0 low, 1 medium, 2 high, 3 extreme
    pub danger_level: u8,
    /// 0 unburned, 1 burning
    pub fire_state: u8,
}

impl From<&Cell> for WildfireCellView {
    fn from(cell: &Cell) -> Self {
        Self {
            surface_type: cell.surface_type().as_u8(),
            danger_level: cell.danger_level().as_u8(),
            fire_state: cell.fire_state().as_u8(),
        }
    }
}

/// FFI-friendly fire-weather index
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WildfireDangerIndex {
    /// Non-negative index score
    pub score: f64,
    /// 0 low, 1 moderate, 2 high, 3 very high, 4 extreme
    pub category: u8,
}

impl From<FireWeatherIndex> for WildfireDangerIndex {
    fn from(index: FireWeatherIndex) -> Self {
        Self {
            score: index.score,
            category: index.category.as_u8(),
        }
    }
}

/// Fill `out_cell` with the state of the cell at row-major `index`.
///
/// Returns
/// - `WildfireErrorCode::Ok` (0) on success
/// - `WildfireErrorCode::NullPointer` if `ptr` or `out_cell` is null
/// - `WildfireErrorCode::InvalidGridReference` if `index` is outside the grid
///
/// # Safety
/// `out_cell` must be null or valid for writing a `WildfireCellView`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_get_cell(
    ptr: *const WildfireInstance,
    index: usize,
    out_cell: *mut WildfireCellView,
) -> WildfireErrorCode {
    if out_cell.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_cell"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let view = with_state(instance, |state| {
            state.grid.cell(index).map(WildfireCellView::from)
        })??;
        unsafe {
            *out_cell = view;
        }
        Ok(())
    })
}

/// Write the grid dimensions to `out_rows` and `out_cols`.
///
/// # Safety
/// Both output pointers must be null or valid for writing.
#[no_mangle]
pub unsafe extern "C" fn wildfire_get_dimensions(
    ptr: *const WildfireInstance,
    out_rows: *mut usize,
    out_cols: *mut usize,
) -> WildfireErrorCode {
    if out_rows.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_rows"));
    }
    if out_cols.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_cols"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let (rows, cols) = with_state(instance, |state| (state.grid.rows(), state.grid.cols()))?;
        unsafe {
            *out_rows = rows;
            *out_cols = cols;
        }
        Ok(())
    })
}

/// Write the number of burning cells to `out_count`.
///
/// # Safety
/// `out_count` must be null or valid for writing.
#[no_mangle]
pub unsafe extern "C" fn wildfire_get_burning_count(
    ptr: *const WildfireInstance,
    out_count: *mut usize,
) -> WildfireErrorCode {
    if out_count.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_count"));
    }

    handle_ffi_result_error(|| {
        let instance = instance_from_ptr(ptr)?;
        let count = with_state(instance, |state| state.grid.burning_count())?;
        unsafe {
            *out_count = count;
        }
        Ok(())
    })
}

/// Compute the fire-weather index for the given conditions.
///
/// Stateless; no instance is required. Non-finite inputs are treated as 0 and
/// reported with `WildfireErrorCode::InvalidWeatherInput`, with `*out_index`
/// still filled in.
///
/// # Safety
/// `out_index` must be null or valid for writing a `WildfireDangerIndex`.
#[no_mangle]
pub unsafe extern "C" fn wildfire_compute_danger_index(
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
    precipitation: f64,
    out_index: *mut WildfireDangerIndex,
) -> WildfireErrorCode {
    if out_index.is_null() {
        return track_error(&DefaultFfiError::null_pointer("out_index"));
    }

    let mut rejected = None;
    let mut finite = |field: &'static str, value: f64| {
        if value.is_finite() {
            value
        } else {
            if rejected.is_none() {
                rejected = Some(WildfireError::InvalidWeatherInput {
                    field,
                    raw: value.to_string(),
                });
            }
            0.0
        }
    };
    let input = WeatherInput::new(
        finite("temperature", temperature),
        finite("humidity", humidity),
        finite("wind_speed", wind_speed),
        finite("precipitation", precipitation),
    );

    unsafe {
        *out_index = WildfireDangerIndex::from(compute_index(&input));
    }
    handle_ffi_result_error(|| match rejected {
        Some(error) => Err(DefaultFfiError::from(error)),
        None => Ok(()),
    })
}
