use std::time::Instant;

use tracing::{debug, info};

use fractalview_core::ViewportState;

use crate::buffer::PixelBuffer;
use crate::error::RenderError;
use crate::input::{InputState, ViewportController};
use crate::overlay::TextSink;
use crate::params::RenderParameters;
use crate::rasterizer::{FrameOutcome, ProgressiveRasterizer, RefinementPhase, RefinementState};

/// One interactive session: fixed parameters, a moving viewport and the
/// refinement progress for the current view.
///
/// The host calls [`on_frame`](Self::on_frame) with the held keys and then
/// [`render`](Self::render) with its pixel buffer, once per frame.
#[derive(Debug, Clone)]
pub struct FractalEngine {
    params: RenderParameters,
    controller: ViewportController,
    rasterizer: ProgressiveRasterizer,
}

impl FractalEngine {
    pub fn new(params: RenderParameters) -> crate::Result<Self> {
        Self::with_viewport(params, ViewportState::default())
    }

    pub fn with_viewport(params: RenderParameters, viewport: ViewportState) -> crate::Result<Self> {
        if !params.compute_mode.is_supported() {
            return Err(RenderError::UnsupportedComputeMode(params.compute_mode));
        }
        if params.resolution == 0 {
            return Err(RenderError::InvalidResolution(params.resolution));
        }
        let rasterizer = ProgressiveRasterizer::new(params.resolution);
        info!(
            resolution = params.resolution,
            depth_multiplier = params.depth_multiplier,
            mode = %params.compute_mode,
            orbit = params.orbit.label(),
            "Engine ready"
        );
        if rasterizer.refinement().phase() == RefinementPhase::Idle {
            debug!(resolution = params.resolution, "Resolution too small to refine; engine idle");
        }
        Ok(Self {
            params,
            controller: ViewportController::new(viewport),
            rasterizer,
        })
    }

    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    pub fn viewport(&self) -> &ViewportState {
        self.controller.viewport()
    }

    pub fn refinement(&self) -> &RefinementState {
        self.rasterizer.refinement()
    }

    /// Apply this frame's input. Returns `true` if the view moved, in which
    /// case refinement restarts from the coarsest pass.
    pub fn on_frame(&mut self, input: &InputState) -> bool {
        self.on_frame_at(input, Instant::now())
    }

    pub fn on_frame_at(&mut self, input: &InputState, now: Instant) -> bool {
        let changed = self.controller.update_at(input, now);
        if changed {
            self.rasterizer.reset();
        }
        changed
    }

    /// Jump to a new viewport and restart refinement.
    pub fn set_viewport(&mut self, viewport: ViewportState) {
        self.controller.set_viewport(viewport);
        self.rasterizer.reset();
    }

    /// Run at most one refinement pass into `buffer`.
    pub fn render(
        &mut self,
        buffer: &mut PixelBuffer<'_>,
        text: &mut dyn TextSink,
    ) -> crate::Result<FrameOutcome> {
        let viewport = *self.controller.viewport();
        self.rasterizer.render(&self.params, &viewport, buffer, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::FrameBuffer;
    use crate::input::Direction;
    use crate::overlay::NullTextSink;
    use crate::strategy::ComputeMode;
    use fractalview_core::Color;

    fn engine(resolution: u64) -> FractalEngine {
        FractalEngine::new(RenderParameters::with_function_name(resolution, "sqr").unwrap()).unwrap()
    }

    #[test]
    fn offloaded_is_rejected_at_construction() {
        let params = RenderParameters::default().with_compute_mode(ComputeMode::Offloaded);
        assert!(matches!(
            FractalEngine::new(params),
            Err(RenderError::UnsupportedComputeMode(ComputeMode::Offloaded))
        ));
    }

    #[test]
    fn converged_render_is_a_no_op() {
        let mut engine = engine(64);
        let mut frame = FrameBuffer::new(64, 64, Color::TRANSPARENT);
        while let FrameOutcome::Rendered(_) = engine
            .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap()
        {}
        let snapshot = frame.pixels.clone();
        for _ in 0..3 {
            let outcome = engine
                .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
                .unwrap();
            assert_eq!(outcome, FrameOutcome::Converged);
        }
        assert_eq!(frame.pixels, snapshot);
    }

    #[test]
    fn movement_resets_refinement() {
        let t0 = Instant::now();
        let mut engine = engine(128);
        let mut frame = FrameBuffer::new(128, 128, Color::TRANSPARENT);
        for _ in 0..3 {
            engine
                .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
                .unwrap();
        }
        assert_eq!(engine.refinement().update_resolution(), 16);

        assert!(!engine.on_frame_at(&InputState::NONE, t0));
        assert_eq!(engine.refinement().update_resolution(), 16);

        assert!(engine.on_frame_at(&InputState::held(&[Direction::ZoomIn]), t0));
        assert_eq!(engine.refinement().update_resolution(), 2);
        match engine
            .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap()
        {
            FrameOutcome::Rendered(report) => assert_eq!(report.deterioration, 64),
            other => panic!("expected a coarse pass, got {other:?}"),
        }
    }

    #[test]
    fn depth_follows_zoom() {
        let mut engine = engine(64);
        engine.set_viewport(ViewportState::new(fractalview_core::Vector2::ZERO, 4.0).unwrap());
        let mut frame = FrameBuffer::new(64, 64, Color::TRANSPARENT);
        match engine
            .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap()
        {
            FrameOutcome::Rendered(report) => assert_eq!(report.depth, 128),
            other => panic!("expected a pass, got {other:?}"),
        }
    }
}
