//! One-shot full-resolution renders for file export.

use std::time::{Duration, Instant};

use tracing::{info, warn};

use fractalview_core::ViewportState;

use crate::buffer::PixelBuffer;
use crate::error::RenderError;
use crate::params::RenderParameters;
use crate::rasterizer::rasterize_pass;
use crate::strategy::ComputeMode;

/// Render every pixel of the default view at a fixed `depth`.
///
/// Unlike the interactive engine the depth is not scaled by zoom. An
/// unsupported compute mode falls back to [`ComputeMode::Sequential`].
pub fn render_still(
    params: &RenderParameters,
    depth: u64,
    buffer: &mut PixelBuffer<'_>,
) -> crate::Result<Duration> {
    if depth == 0 {
        return Err(RenderError::InvalidDepth(depth));
    }
    let mode = if params.compute_mode.is_supported() {
        params.compute_mode
    } else {
        warn!(
            requested = %params.compute_mode,
            fallback = %ComputeMode::Sequential,
            "Compute mode not available for still images, falling back"
        );
        ComputeMode::Sequential
    };

    let start = Instant::now();
    rasterize_pass(params, mode, &ViewportState::default(), depth, 1, buffer)?;
    let elapsed = start.elapsed();
    info!(
        resolution = params.resolution,
        depth,
        mode = %mode,
        elapsed_ms = elapsed.as_millis(),
        "Still image rendered"
    );
    Ok(elapsed)
}
