use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use fractalview_core::{colorize, depth_for_zoom, escape_level, Color, ViewportState};

use crate::buffer::PixelBuffer;
use crate::overlay::{Overlay, TextSink};
use crate::params::RenderParameters;
use crate::strategy::{for_each_band, ComputeMode};

// ---------------------------------------------------------------------------
// Refinement state
// ---------------------------------------------------------------------------

/// Ratio between the image side and the coarsest refinement step.
pub const REFINEMENT_BEGIN_DIVISOR: u64 = 64;

/// Where a session is in its coarse-to-fine sequence.
///
/// `update_resolution` is the number of representative pixels per image
/// side in the next pass. It starts at `resolution / 64` and doubles after
/// every pass; once it exceeds `resolution` every pixel has been computed
/// individually and rendering stops until the viewport changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefinementState {
    resolution: u64,
    update_resolution_begin: u64,
    update_resolution: u64,
}

/// Coarse classification of a [`RefinementState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementPhase {
    /// The image is too small to refine; nothing is ever drawn.
    Idle,
    Refining,
    Converged,
}

impl RefinementState {
    pub fn new(resolution: u64) -> Self {
        let begin = resolution / REFINEMENT_BEGIN_DIVISOR;
        Self {
            resolution,
            update_resolution_begin: begin,
            update_resolution: begin,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(resolution: u64, update_resolution_begin: u64, update_resolution: u64) -> Self {
        Self {
            resolution,
            update_resolution_begin,
            update_resolution,
        }
    }

    pub fn resolution(&self) -> u64 {
        self.resolution
    }

    pub fn update_resolution_begin(&self) -> u64 {
        self.update_resolution_begin
    }

    pub fn update_resolution(&self) -> u64 {
        self.update_resolution
    }

    pub fn phase(&self) -> RefinementPhase {
        if self.update_resolution_begin == 0 || self.resolution < self.update_resolution_begin {
            RefinementPhase::Idle
        } else if self.update_resolution > self.resolution {
            RefinementPhase::Converged
        } else {
            RefinementPhase::Refining
        }
    }

    pub fn is_converged(&self) -> bool {
        self.phase() == RefinementPhase::Converged
    }

    /// Block side length for the next pass, or `None` when it would be 0.
    pub fn deterioration(&self) -> Option<u64> {
        self.resolution
            .checked_div(self.update_resolution)
            .filter(|&k| k > 0)
    }

    /// Restart the coarse-to-fine sequence.
    pub fn reset(&mut self) {
        self.update_resolution = self.update_resolution_begin;
    }

    fn advance(&mut self) {
        self.update_resolution = self.update_resolution.saturating_mul(2);
    }
}

// ---------------------------------------------------------------------------
// Frame outcome
// ---------------------------------------------------------------------------

/// Statistics for one refinement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassReport {
    /// Block side length of the pass.
    pub deterioration: u64,
    /// Iteration cap used for every representative.
    pub depth: u64,
    pub elapsed: Duration,
}

/// What a render call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// One refinement pass was written.
    Rendered(PassReport),
    /// Already converged; the buffer was left as is.
    Converged,
    /// The configuration is too small to refine; the buffer was left as is.
    Idle,
    /// The block size came out as 0; the frame was skipped.
    Degenerate,
}

// ---------------------------------------------------------------------------
// Pass
// ---------------------------------------------------------------------------

/// Top-left corner of the `block`-sized cell containing `coord`.
///
/// Always `<= coord`, so a derived pixel never reads from a later row or
/// column than its own.
#[inline]
pub fn representative(coord: usize, block: usize) -> usize {
    coord - coord % block
}

/// Write one full pass over the `resolution × resolution` logical image.
///
/// Each band is one block row: its first row holds the representatives
/// (computed at block-aligned columns, copied within the row elsewhere),
/// and the remaining rows copy the first. A band owns every pixel it
/// reads, which is what lets bands run in parallel.
pub(crate) fn rasterize_pass(
    params: &RenderParameters,
    mode: ComputeMode,
    viewport: &ViewportState,
    depth: u64,
    block: u64,
    buffer: &mut PixelBuffer<'_>,
) -> crate::Result<()> {
    buffer.ensure_fits(params.resolution)?;

    let resolution = params.resolution as usize;
    let stride = buffer.width() as usize;
    let block = block as usize;
    let side = params.resolution;
    let (f, orbit) = (params.function, params.orbit);
    let (mask, background) = (params.color_mask, params.background_color);
    let viewport = *viewport;

    let exec_row = |y: usize, row: &mut [Color]| {
        for x in 0..resolution {
            let rx = representative(x, block);
            row[x] = if rx == x {
                let sample = viewport.pixel_to_sample(x as u64, y as u64, side, side);
                let level = escape_level(sample, depth, f, orbit);
                colorize(level, depth, mask, background)
            } else {
                row[rx]
            };
        }
    };

    let exec_band = |band_index: usize, band: &mut [Color]| {
        let (head, rest) = band.split_at_mut(stride.min(band.len()));
        exec_row(band_index * block, head);
        for row in rest.chunks_mut(stride) {
            row[..resolution].copy_from_slice(&head[..resolution]);
        }
    };

    let region = &mut buffer.pixels_mut()[..resolution * stride];
    for_each_band(mode, region, block * stride, exec_band)
}

// ---------------------------------------------------------------------------
// Progressive rasterizer
// ---------------------------------------------------------------------------

/// Coarse-to-fine renderer.
///
/// Every call to [`render`](Self::render) writes the whole logical image at
/// the current block size and then halves the block size, so the host
/// always shows a complete (if blocky) picture.
#[derive(Debug, Clone)]
pub struct ProgressiveRasterizer {
    refinement: RefinementState,
}

impl ProgressiveRasterizer {
    pub fn new(resolution: u64) -> Self {
        Self {
            refinement: RefinementState::new(resolution),
        }
    }

    pub fn refinement(&self) -> &RefinementState {
        &self.refinement
    }

    #[cfg(test)]
    pub(crate) fn refinement_mut(&mut self) -> &mut RefinementState {
        &mut self.refinement
    }

    /// Restart refinement from the coarsest block size.
    pub fn reset(&mut self) {
        self.refinement.reset();
    }

    /// Run one refinement pass, then draw the overlay.
    ///
    /// The buffer is only touched when the outcome is
    /// [`FrameOutcome::Rendered`]. Sizing errors are reported before any
    /// pixel is written.
    pub fn render(
        &mut self,
        params: &RenderParameters,
        viewport: &ViewportState,
        buffer: &mut PixelBuffer<'_>,
        text: &mut dyn TextSink,
    ) -> crate::Result<FrameOutcome> {
        match self.refinement.phase() {
            RefinementPhase::Idle => return Ok(FrameOutcome::Idle),
            RefinementPhase::Converged => return Ok(FrameOutcome::Converged),
            RefinementPhase::Refining => {}
        }

        let Some(deterioration) = self.refinement.deterioration() else {
            warn!(
                resolution = self.refinement.resolution,
                update_resolution = self.refinement.update_resolution,
                "Deterioration coefficient is 0, skipping frame"
            );
            return Ok(FrameOutcome::Degenerate);
        };

        let start = Instant::now();
        let depth = depth_for_zoom(params.depth_multiplier, viewport.zoom);
        rasterize_pass(
            params,
            params.compute_mode,
            viewport,
            depth,
            deterioration,
            buffer,
        )?;

        Overlay::new(viewport, depth, deterioration, params.resolution).draw(text);

        self.refinement.advance();
        let elapsed = start.elapsed();
        debug!(
            deterioration,
            depth,
            mode = %params.compute_mode,
            elapsed_ms = elapsed.as_millis(),
            "Refinement pass complete"
        );
        if self.refinement.is_converged() {
            info!(resolution = params.resolution, depth, "Image converged");
        }

        Ok(FrameOutcome::Rendered(PassReport {
            deterioration,
            depth,
            elapsed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::FrameBuffer;
    use crate::overlay::NullTextSink;

    fn params(resolution: u64) -> RenderParameters {
        RenderParameters::with_function_name(resolution, "sqr").unwrap()
    }

    #[test]
    fn representative_never_points_forward() {
        for block in [1, 2, 3, 7, 16, 64] {
            for coord in 0..200 {
                let r = representative(coord, block);
                assert!(r <= coord);
                assert_eq!(r % block, 0);
                assert!(coord - r < block);
            }
        }
    }

    #[test]
    fn refinement_starts_at_one_sixty_fourth() {
        let state = RefinementState::new(1024);
        assert_eq!(state.update_resolution_begin(), 16);
        assert_eq!(state.update_resolution(), 16);
        assert_eq!(state.deterioration(), Some(64));
        assert_eq!(state.phase(), RefinementPhase::Refining);
    }

    #[test]
    fn small_images_are_idle() {
        for resolution in [0, 1, 8, 63] {
            assert_eq!(RefinementState::new(resolution).phase(), RefinementPhase::Idle);
        }
        assert_eq!(RefinementState::new(64).phase(), RefinementPhase::Refining);
    }

    #[test]
    fn idle_render_leaves_buffer_untouched() {
        let p = params(8);
        let mut rasterizer = ProgressiveRasterizer::new(8);
        let mut frame = FrameBuffer::new(8, 8, Color::BLACK);
        let outcome = rasterizer
            .render(&p, &ViewportState::default(), &mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Idle);
        assert!(frame.pixels.iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn zero_step_is_degenerate_and_not_fatal() {
        let p = params(128);
        let mut rasterizer = ProgressiveRasterizer::new(128);
        *rasterizer.refinement_mut() = RefinementState::from_parts(128, 2, 0);
        let mut frame = FrameBuffer::new(128, 128, Color::BLACK);
        let outcome = rasterizer
            .render(&p, &ViewportState::default(), &mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Degenerate);
        assert_eq!(rasterizer.refinement().update_resolution(), 0);
        assert!(frame.pixels.iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn undersized_buffer_fails_before_writing() {
        let p = params(128);
        let mut rasterizer = ProgressiveRasterizer::new(128);
        let mut frame = FrameBuffer::new(128, 100, Color::BLACK);
        let result = rasterizer.render(
            &p,
            &ViewportState::default(),
            &mut frame.as_pixel_buffer(),
            &mut NullTextSink,
        );
        assert!(matches!(result, Err(crate::RenderError::BufferTooSmall { .. })));
        assert!(frame.pixels.iter().all(|&c| c == Color::BLACK));
        assert_eq!(rasterizer.refinement().update_resolution(), 2);
    }

    #[test]
    fn passes_halve_block_size_until_converged() {
        let p = params(256);
        let mut rasterizer = ProgressiveRasterizer::new(256);
        let mut frame = FrameBuffer::new(256, 256, Color::TRANSPARENT);
        let mut blocks = Vec::new();
        loop {
            let outcome = rasterizer
                .render(&p, &ViewportState::default(), &mut frame.as_pixel_buffer(), &mut NullTextSink)
                .unwrap();
            match outcome {
                FrameOutcome::Rendered(report) => blocks.push(report.deterioration),
                FrameOutcome::Converged => break,
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(blocks, vec![64, 32, 16, 8, 4, 2, 1]);
        assert!(rasterizer.refinement().is_converged());
    }

    #[test]
    fn wider_buffer_keeps_pixels_outside_the_image() {
        let p = params(64);
        let mut rasterizer = ProgressiveRasterizer::new(64);
        let sentinel = Color(0x1234_5678);
        let mut frame = FrameBuffer::new(80, 70, sentinel);
        rasterizer
            .render(&p, &ViewportState::default(), &mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap();
        for y in 0..70 {
            for x in 0..80 {
                let inside = x < 64 && y < 64;
                assert_eq!(frame.get(x, y) != Some(sentinel), inside, "pixel ({x}, {y})");
            }
        }
    }
}
