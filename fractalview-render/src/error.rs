use thiserror::Error;

use crate::strategy::ComputeMode;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height} for {len} pixels")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("pixel buffer {width}×{height} cannot hold a {resolution}×{resolution} image")]
    BufferTooSmall {
        width: u32,
        height: u32,
        resolution: u64,
    },

    #[error("invalid resolution: {0} (must be > 0)")]
    InvalidResolution(u64),

    #[error("invalid depth: {0} (must be >= 1)")]
    InvalidDepth(u64),

    #[error("compute mode '{0}' is not supported")]
    UnsupportedComputeMode(ComputeMode),

    #[error("unknown compute mode '{0}' (expected cpu, cpu-concurrent or gpu)")]
    UnknownComputeMode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] fractalview_core::CoreError),
}
