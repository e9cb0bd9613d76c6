pub mod buffer;
pub mod engine;
pub mod error;
pub mod export;
pub mod input;
pub mod overlay;
pub mod params;
pub mod rasterizer;
pub mod still;
pub mod strategy;

pub use buffer::{FrameBuffer, PixelBuffer};
pub use engine::FractalEngine;
pub use error::RenderError;
pub use export::{export_png, ExportMetadata};
pub use input::{Direction, InputState, ViewportController};
pub use overlay::{NullTextSink, Overlay, TextSink};
pub use params::RenderParameters;
pub use rasterizer::{FrameOutcome, PassReport, ProgressiveRasterizer, RefinementState};
pub use still::render_still;
pub use strategy::ComputeMode;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
