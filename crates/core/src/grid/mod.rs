//! Terrain grid, surface classification and image resampling

pub mod classifier;
pub mod landscape;
pub mod pixel_source;

// Re-export main types
pub use classifier::{classify, classify_rgb};
pub use landscape::{Cell, GridStats, LandscapeGrid, Neighbor, ResetMode, NEIGHBOR_OFFSETS};
pub use pixel_source::{center_crop, CropWindow, PixelBuffer};
