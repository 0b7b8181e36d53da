//! In-memory pixel buffers and aspect-preserving resampling onto a grid
//!
//! A source image of any size is center-cropped to the grid's aspect ratio and
//! then sampled once per destination cell, at the centre of that cell's
//! footprint in the cropped region.

use crate::error::{Result, WildfireError};
use tracing::warn;

/// Validated RGB or RGBA pixel buffer in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap a tightly packed RGBA buffer (4 bytes per pixel)
    ///
    /// # Errors
    /// Returns [`WildfireError::ClassificationInput`] for zero dimensions or a
    /// data length that does not match `width * height * 4`.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, 4, data)
    }

    /// Wrap a tightly packed RGB buffer (3 bytes per pixel)
    ///
    /// # Errors
    /// Returns [`WildfireError::ClassificationInput`] for zero dimensions or a
    /// data length that does not match `width * height * 3`.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, 3, data)
    }

    /// Decode an encoded image (PNG or JPEG) into an RGBA buffer
    ///
    /// # Errors
    /// Returns [`WildfireError::ClassificationInput`] if the bytes are empty or
    /// cannot be decoded.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(reject("image data is empty".to_string()));
        }
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            warn!(error = %e, "failed to decode classification image");
            WildfireError::from(e)
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width as usize, height as usize, rgba.into_raw())
    }

    fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(reject(format!(
                "image dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or_else(|| reject(format!("image dimensions {width}x{height} overflow")))?;
        if data.len() != expected {
            return Err(reject(format!(
                "pixel buffer size mismatch: expected {width}x{height}x{channels} = {expected} \
                 bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// RGB of the pixel at `(x, y)`; alpha, if present, is dropped.
    /// Coordinates are clamped to the image.
    pub fn rgb_at(&self, x: usize, y: usize) -> [u8; 3] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let offset = (y * self.width + x) * self.channels;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    /// Sample the pixel that lands at the centre of destination cell `(x, y)`
    /// of a `rows × cols` grid laid over `window`.
    pub fn sample(
        &self,
        window: &CropWindow,
        rows: usize,
        cols: usize,
        x: usize,
        y: usize,
    ) -> [u8; 3] {
        let sx = window.x + (x as f64 + 0.5) * window.width / cols as f64;
        let sy = window.y + (y as f64 + 0.5) * window.height / rows as f64;
        self.rgb_at(sx.floor() as usize, sy.floor() as usize)
    }
}

fn reject(reason: String) -> WildfireError {
    warn!(%reason, "classification input rejected");
    WildfireError::ClassificationInput(reason)
}

/// Region of the source image that is mapped onto the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Largest centred region of a `src_width × src_height` image whose aspect
/// ratio matches a `rows × cols` grid.
///
/// A proportionally wider source loses equal margins left and right, a taller
/// one loses equal margins top and bottom.
pub fn center_crop(src_width: usize, src_height: usize, rows: usize, cols: usize) -> CropWindow {
    let (src_w, src_h) = (src_width as f64, src_height as f64);
    let source_ratio = src_w / src_h;
    let target_ratio = cols as f64 / rows as f64;

    if source_ratio > target_ratio {
        let width = src_h * target_ratio;
        CropWindow {
            x: (src_w - width) / 2.0,
            y: 0.0,
            width,
            height: src_h,
        }
    } else if source_ratio < target_ratio {
        let height = src_w / target_ratio;
        CropWindow {
            x: 0.0,
            y: (src_h - height) / 2.0,
            width: src_w,
            height,
        }
    } else {
        CropWindow {
            x: 0.0,
            y: 0.0,
            width: src_w,
            height: src_h,
        }
    }
}
