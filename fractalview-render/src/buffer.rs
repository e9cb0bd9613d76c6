use fractalview_core::Color;

use crate::error::RenderError;

/// A borrowed, row-major pixel surface (stride = width).
///
/// The engine holds one of these only for the duration of a render call;
/// the pixels themselves belong to the host.
#[derive(Debug)]
pub struct PixelBuffer<'a> {
    pixels: &'a mut [Color],
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap a host-owned slice. Fails if its length is not `width × height`.
    pub fn new(pixels: &'a mut [Color], width: u32, height: u32) -> crate::Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(RenderError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &*self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut *self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Fails unless a `resolution × resolution` image fits in the top-left corner.
    pub(crate) fn ensure_fits(&self, resolution: u64) -> crate::Result<()> {
        if (self.width as u64) < resolution || (self.height as u64) < resolution {
            return Err(RenderError::BufferTooSmall {
                width: self.width,
                height: self.height,
                resolution,
            });
        }
        Ok(())
    }
}

/// An owned pixel surface, used by headless hosts and tests.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new buffer filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Borrow the whole surface for one render call.
    pub fn as_pixel_buffer(&mut self) -> PixelBuffer<'_> {
        PixelBuffer {
            pixels: &mut self.pixels,
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// RGBA bytes, 4 per pixel, row-major.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba()).collect()
    }
}
