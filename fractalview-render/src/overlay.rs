//! Status text drawn over the image after each refinement pass.

use fractalview_core::{Color, ViewportState};

/// Text-drawing primitive supplied by the host.
pub trait TextSink {
    fn draw_text(&mut self, content: &str, position: (f64, f64), color: Color, font_size: u32);
}

/// Closures can act as sinks directly.
impl<F> TextSink for F
where
    F: FnMut(&str, (f64, f64), Color, u32),
{
    fn draw_text(&mut self, content: &str, position: (f64, f64), color: Color, font_size: u32) {
        self(content, position, color, font_size)
    }
}

/// Discards all text.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTextSink;

impl TextSink for NullTextSink {
    fn draw_text(&mut self, _: &str, _: (f64, f64), _: Color, _: u32) {}
}

pub const OVERLAY_POSITION: (f64, f64) = (8.0, 8.0);
pub const OVERLAY_COLOR: Color = Color::WHITE;

/// The overlay for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub content: String,
    pub font_size: u32,
}

impl Overlay {
    /// Build the two-line status text. The font is sized so the first line
    /// spans roughly the image width.
    pub fn new(viewport: &ViewportState, depth: u64, deterioration: u64, resolution: u64) -> Self {
        let position = format!(
            "{{ {:.6}, {:.6}, {:.6} }}",
            viewport.offset.x, viewport.offset.y, viewport.zoom
        );
        let font_size = (resolution / position.len() as u64).max(1);
        Self {
            content: format!("{position}\nDepth: {depth} Deterioration: {deterioration}"),
            font_size: u32::try_from(font_size).unwrap_or(u32::MAX),
        }
    }

    pub fn draw(&self, sink: &mut dyn TextSink) {
        sink.draw_text(&self.content, OVERLAY_POSITION, OVERLAY_COLOR, self.font_size);
    }
}
