//! Scripted navigation through the progressive engine, for hosts without a window.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use fractalview_core::Color;
use fractalview_render::{
    Direction, FractalEngine, FrameBuffer, FrameOutcome, InputState, RenderParameters,
};

/// Simulated time between frames (60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Upper bound on frames spent settling after the script ends.
const MAX_SETTLE_FRAMES: u32 = 64;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames: u32,
    pub passes: u32,
    /// Frames where navigation restarted refinement.
    pub restarts: u32,
    pub converged: bool,
}

/// Run `script` (held keys, frame count) and then idle until the image
/// converges. Returns the final frame and what happened.
pub fn run_session(
    params: RenderParameters,
    script: &[(Vec<Direction>, u32)],
) -> fractalview_render::Result<(FrameBuffer, SessionSummary)> {
    let mut engine = FractalEngine::new(params)?;
    let side = u32::try_from(params.resolution).unwrap_or(u32::MAX);
    let mut frame = FrameBuffer::new(side, side, params.background_color);
    let mut summary = SessionSummary::default();
    let mut overlay = |content: &str, _: (f64, f64), _: Color, font_size: u32| {
        debug!(font_size, "{}", content.replace('\n', " | "));
    };

    let start = Instant::now();
    let mut clock = start;
    let mut step = |engine: &mut FractalEngine,
                    frame: &mut FrameBuffer,
                    summary: &mut SessionSummary,
                    input: &InputState|
     -> fractalview_render::Result<FrameOutcome> {
        if engine.on_frame_at(input, clock) {
            summary.restarts += 1;
        }
        clock += FRAME_INTERVAL;
        summary.frames += 1;
        let outcome = engine.render(&mut frame.as_pixel_buffer(), &mut overlay)?;
        if let FrameOutcome::Rendered(_) = outcome {
            summary.passes += 1;
        }
        Ok(outcome)
    };

    for (keys, frames) in script {
        let input = InputState::held(keys);
        for _ in 0..*frames {
            step(&mut engine, &mut frame, &mut summary, &input)?;
        }
    }

    for _ in 0..MAX_SETTLE_FRAMES {
        match step(&mut engine, &mut frame, &mut summary, &InputState::NONE)? {
            FrameOutcome::Rendered(_) => {}
            FrameOutcome::Converged => {
                summary.converged = true;
                break;
            }
            FrameOutcome::Idle | FrameOutcome::Degenerate => break,
        }
    }

    let vp = engine.viewport();
    info!(
        frames = summary.frames,
        passes = summary.passes,
        restarts = summary.restarts,
        converged = summary.converged,
        x = vp.offset.x,
        y = vp.offset.y,
        zoom = vp.zoom,
        elapsed_ms = start.elapsed().as_millis(),
        "Session finished"
    );
    Ok((frame, summary))
}
