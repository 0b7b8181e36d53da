//! Landscape grid: surface type, derived danger level and fire state per cell
//!
//! Cells are stored in row-major order: index `i = y * cols + x`, so the column
//! of `i` is `i % cols` and the row is `i / cols`. Neighbour lookups work on
//! signed `(x, y)` coordinates, which rules out wrap-around between the last
//! column of one row and the first column of the next.

use crate::core_types::{DangerLevel, FireState, SurfaceType};
use crate::error::{Result, WildfireError};
use crate::grid::classifier::classify_rgb;
use crate::grid::pixel_source::{center_crop, PixelBuffer};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// 8-connected neighbour offsets in scan order: NW, N, NE, W, E, SW, S, SE
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// One terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub(crate) surface_type: SurfaceType,
    pub(crate) danger_level: DangerLevel,
    pub(crate) fire_state: FireState,
}

impl Cell {
    /// Unburned cell of the given surface type
    pub fn new(surface_type: SurfaceType) -> Self {
        Cell {
            surface_type,
            danger_level: surface_type.danger_level(),
            fire_state: FireState::Unburned,
        }
    }

    pub fn surface_type(&self) -> SurfaceType {
        self.surface_type
    }

    pub fn danger_level(&self) -> DangerLevel {
        self.danger_level
    }

    pub fn fire_state(&self) -> FireState {
        self.fire_state
    }

    pub fn is_burning(&self) -> bool {
        self.fire_state.is_burning()
    }

    pub fn is_barrier(&self) -> bool {
        self.surface_type.is_barrier()
    }

    /// Surface type and danger level always change together
    fn set_surface(&mut self, surface_type: SurfaceType) {
        self.surface_type = surface_type;
        self.danger_level = surface_type.danger_level();
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new(SurfaceType::default())
    }
}

/// A grid neighbour together with the unit offset that reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub index: usize,
    pub dx: i32,
    pub dy: i32,
}

/// How [`LandscapeGrid::reset`] treats surface types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetMode {
    /// Extinguish everything, keep the classified terrain
    #[default]
    KeepSurface,
    /// Extinguish everything and forget the terrain (all `unknown`)
    ClearSurface,
}

/// Fixed-size rectangular terrain grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl LandscapeGrid {
    /// Customary grid edge lengths for square maps
    pub const STANDARD_SIZES: [usize; 3] = [30, 60, 120];

    /// Grid of `unknown`, unburned cells
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidParameter`] if either dimension is zero or
    /// `rows * cols` overflows.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::filled(rows, cols, SurfaceType::Unknown)
    }

    /// Grid where every cell has the same surface type
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidParameter`] if either dimension is zero or
    /// `rows * cols` overflows.
    pub fn filled(rows: usize, cols: usize, surface: SurfaceType) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::new(surface); len],
        })
    }

    /// Grid built from row-major surface labels
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidParameter`] for invalid dimensions or when
    /// `surfaces.len() != rows * cols`.
    pub fn from_surfaces(rows: usize, cols: usize, surfaces: &[SurfaceType]) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        if surfaces.len() != len {
            return Err(WildfireError::invalid_parameter(
                "surfaces",
                format!(
                    "expected {rows}x{cols} = {len} labels, got {}",
                    surfaces.len()
                ),
            ));
        }
        Ok(Self {
            rows,
            cols,
            cells: surfaces.iter().copied().map(Cell::new).collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (`rows * cols`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: construction rejects empty grids
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a row-major index
    ///
    /// # Errors
    /// Returns [`WildfireError::InvalidGridReference`] if `index` is out of range.
    pub fn cell(&self, index: usize) -> Result<&Cell> {
        self.cells
            .get(index)
            .ok_or(WildfireError::InvalidGridReference {
                index,
                len: self.cells.len(),
            })
    }

    /// Cell at column `x`, row `y`
    pub fn cell_at(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Row-major index of `(x, y)`, if inside the grid
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.cols && y < self.rows).then(|| y * self.cols + x)
    }

    /// `(x, y)` of a row-major index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.cols, index / self.cols)
    }

    /// In-bounds 8-connected neighbours of `index`, in [`NEIGHBOR_OFFSETS`] order
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = Neighbor> + '_ {
        let (x, y) = self.coords(index);
        let (x, y) = (x as i64, y as i64);
        NEIGHBOR_OFFSETS.into_iter().filter_map(move |(dx, dy)| {
            let nx = x + i64::from(dx);
            let ny = y + i64::from(dy);
            if nx < 0 || ny < 0 || nx >= self.cols as i64 || ny >= self.rows as i64 {
                return None;
            }
            Some(Neighbor {
                index: ny as usize * self.cols + nx as usize,
                dx,
                dy,
            })
        })
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        self.cell(index).map(|_| ())
    }

    /// Manually set the surface type of one cell. Danger level follows the
    /// fixed table; fire state is untouched.
    ///
    /// # Errors
    /// - [`WildfireError::InvalidGridReference`] if `index` is out of range
    /// - [`WildfireError::InvalidParameter`] when painting a barrier surface
    ///   onto a burning cell; barriers are never burning
    ///
    /// The cell is unchanged on error.
    pub fn set_surface(&mut self, index: usize, surface: SurfaceType) -> Result<()> {
        self.check_index(index)?;
        if surface.is_barrier() && self.cells[index].is_burning() {
            return Err(WildfireError::invalid_parameter(
                "surface",
                format!("cannot paint {surface} onto burning cell {index}"),
            ));
        }
        self.cells[index].set_surface(surface);
        debug!(index, surface = %surface, "surface edited");
        Ok(())
    }

    /// Reclassify every cell from an image.
    ///
    /// The source is center-cropped to the grid aspect ratio and sampled once
    /// per cell. Labels for the whole grid are computed before any cell is
    /// written. Fire state is kept, except that a burning cell relabelled as a
    /// barrier goes out.
    ///
    /// # Errors
    /// Currently infallible for a validated [`PixelBuffer`]; kept fallible so
    /// that callers treat all classification entry points alike.
    pub fn classify_image(&mut self, source: &PixelBuffer) -> Result<()> {
        let (rows, cols) = (self.rows, self.cols);
        let window = center_crop(source.width(), source.height(), rows, cols);

        let labels: Vec<SurfaceType> = (0..self.cells.len())
            .into_par_iter()
            .map(|i| classify_rgb(source.sample(&window, rows, cols, i % cols, i / cols)))
            .collect();

        for (cell, surface) in self.cells.iter_mut().zip(labels) {
            cell.set_surface(surface);
            if surface.is_barrier() {
                cell.fire_state = FireState::Unburned;
            }
        }

        debug!(
            rows,
            cols,
            source_width = source.width(),
            source_height = source.height(),
            "grid classified from image"
        );
        Ok(())
    }

    /// Decode encoded image bytes and reclassify every cell.
    ///
    /// # Errors
    /// Returns [`WildfireError::ClassificationInput`] if the bytes cannot be
    /// decoded; the grid is left unmodified.
    pub fn classify_image_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let source = PixelBuffer::decode(bytes)?;
        self.classify_image(&source)
    }

    /// Put every cell back to `unburned`, optionally clearing the terrain
    pub fn reset(&mut self, mode: ResetMode) {
        for cell in &mut self.cells {
            cell.fire_state = FireState::Unburned;
            if mode == ResetMode::ClearSurface {
                cell.set_surface(SurfaceType::Unknown);
            }
        }
        debug!(?mode, "grid reset");
    }

    /// Transition `unburned → burning`. Returns whether the state changed;
    /// barriers and burning cells are left alone.
    pub(crate) fn mark_burning(&mut self, index: usize) -> bool {
        let cell = &mut self.cells[index];
        if cell.is_barrier() || cell.is_burning() {
            return false;
        }
        cell.fire_state = FireState::Burning;
        true
    }

    /// Indices of all burning cells in ascending order
    pub fn burning_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_burning())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn burning_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_burning()).count()
    }

    /// Composition and fire summary
    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            total_cells: self.cells.len(),
            ..GridStats::default()
        };
        for cell in &self.cells {
            stats.surface_counts[usize::from(cell.surface_type.as_u8())] += 1;
            stats.danger_counts[usize::from(cell.danger_level.as_u8())] += 1;
            if cell.is_burning() {
                stats.burning_cells += 1;
            }
        }
        stats
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(WildfireError::invalid_parameter(
            "grid_dimensions",
            format!("rows and cols must be positive, got {rows}x{cols}"),
        ));
    }
    rows.checked_mul(cols).ok_or_else(|| {
        WildfireError::invalid_parameter(
            "grid_dimensions",
            format!("{rows}x{cols} exceeds addressable size"),
        )
    })
}

/// Grid composition summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GridStats {
    pub total_cells: usize,
    pub burning_cells: usize,
    /// Indexed by [`SurfaceType::as_u8`]
    pub surface_counts: [usize; 6],
    /// Indexed by [`DangerLevel::as_u8`]
    pub danger_counts: [usize; 4],
}

impl GridStats {
    pub fn surface_count(&self, surface: SurfaceType) -> usize {
        self.surface_counts[usize::from(surface.as_u8())]
    }

    pub fn danger_count(&self, level: DangerLevel) -> usize {
        self.danger_counts[usize::from(level.as_u8())]
    }

    /// Fraction of all cells that are burning
    pub fn burned_fraction(&self) -> f64 {
        if self.total_cells == 0 {
            0.0
        } else {
            self.burning_cells as f64 / self.total_cells as f64
        }
    }

    /// Fraction of the burnable (non-barrier) cells that are burning
    pub fn burnable_fraction_burned(&self) -> f64 {
        let burnable = self.total_cells
            - self.surface_count(SurfaceType::Water)
            - self.surface_count(SurfaceType::Sand);
        if burnable == 0 {
            0.0
        } else {
            self.burning_cells as f64 / burnable as f64
        }
    }
}
