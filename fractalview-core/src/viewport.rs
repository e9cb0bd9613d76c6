use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// A 2D vector in plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn to_complex(self) -> Complex {
        Complex::new(self.x, self.y)
    }
}

/// The visible region of the plane: a pan offset and a zoom factor.
///
/// Screen coordinates are normalized to `[-1, 1]` along both axes, divided
/// by `zoom` and then translated by `offset`. Zoom 0.5 therefore shows
/// `[-2, 2]²` around the offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub offset: Vector2,
    pub zoom: f64,
}

impl ViewportState {
    pub const INITIAL_ZOOM: f64 = 0.5;

    pub fn new(offset: Vector2, zoom: f64) -> crate::Result<Self> {
        if zoom <= 0.0 || !zoom.is_finite() {
            return Err(CoreError::InvalidZoom(zoom));
        }
        Ok(Self { offset, zoom })
    }

    /// Map pixel `(x, y)` of a `width × height` image to a plane sample.
    ///
    /// The arithmetic order (normalize, divide by zoom, then translate) is
    /// fixed; reordering it changes the low bits of every sample.
    #[inline]
    pub fn pixel_to_sample(&self, x: u64, y: u64, width: u64, height: u64) -> Complex {
        let nx = x as f64 / width as f64 * 2.0 - 1.0;
        let ny = y as f64 / height as f64 * 2.0 - 1.0;
        Complex::new(nx / self.zoom + self.offset.x, ny / self.zoom + self.offset.y)
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            offset: Vector2::ZERO,
            zoom: Self::INITIAL_ZOOM,
        }
    }
}
