use fractalview_core::{Color, OrbitConvention, Vector2, ViewportState};
use fractalview_render::{
    render_still, ComputeMode, Direction, FractalEngine, FrameBuffer, FrameOutcome, InputState,
    NullTextSink, RenderParameters,
};

/// Drive `engine` until it reports convergence, returning the block size of
/// each pass.
fn run_to_convergence(engine: &mut FractalEngine, frame: &mut FrameBuffer) -> Vec<u64> {
    let mut blocks = Vec::new();
    loop {
        match engine
            .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap()
        {
            FrameOutcome::Rendered(report) => blocks.push(report.deterioration),
            FrameOutcome::Converged => return blocks,
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}

fn params(resolution: u64, function: &str) -> RenderParameters {
    RenderParameters::with_function_name(resolution, function).unwrap()
}

#[test]
fn sequential_and_parallel_converge_to_the_same_image() {
    for function in ["sqr", "sin_sqr", "floor8_sqr", "exp_sqr"] {
        let base = params(256, function).with_depth_multiplier(16);
        let mut images = Vec::new();
        for mode in [ComputeMode::Sequential, ComputeMode::DataParallel] {
            let mut engine = FractalEngine::new(base.with_compute_mode(mode)).unwrap();
            let mut frame = FrameBuffer::new(256, 256, Color::TRANSPARENT);
            run_to_convergence(&mut engine, &mut frame);
            images.push(frame.pixels);
        }
        assert_eq!(images[0], images[1], "modes disagree for {function}");
    }
}

#[test]
fn every_pass_matches_across_modes() {
    let base = params(128, "cos_sqr");
    let mut seq = FractalEngine::new(base).unwrap();
    let mut par = FractalEngine::new(base.with_compute_mode(ComputeMode::DataParallel)).unwrap();
    let mut a = FrameBuffer::new(128, 128, Color::TRANSPARENT);
    let mut b = FrameBuffer::new(128, 128, Color::TRANSPARENT);
    for _ in 0..7 {
        seq.render(&mut a.as_pixel_buffer(), &mut NullTextSink).unwrap();
        par.render(&mut b.as_pixel_buffer(), &mut NullTextSink).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }
}

#[test]
fn seven_passes_from_coarsest_to_full_resolution() {
    for resolution in [64, 128, 1024] {
        let p = params(resolution, "sqr").with_depth_multiplier(1);
        let mut engine = FractalEngine::new(p).unwrap();
        let side = resolution as u32;
        let mut frame = FrameBuffer::new(side, side, Color::TRANSPARENT);
        let blocks = run_to_convergence(&mut engine, &mut frame);
        assert_eq!(blocks, vec![64, 32, 16, 8, 4, 2, 1], "resolution {resolution}");
    }
}

#[test]
fn no_cell_is_left_unwritten_by_any_pass() {
    let sentinel = Color(0x0bad_f00d);
    for mode in [ComputeMode::Sequential, ComputeMode::DataParallel] {
        let mut engine = FractalEngine::new(params(192, "sqr").with_compute_mode(mode)).unwrap();
        let mut frame = FrameBuffer::new(192, 192, sentinel);
        loop {
            frame.pixels.fill(sentinel);
            let outcome = engine
                .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
                .unwrap();
            let FrameOutcome::Rendered(report) = outcome else {
                break;
            };
            assert!(
                frame.pixels.iter().all(|&c| c != sentinel),
                "{mode} pass with block {} left a cell unwritten",
                report.deterioration
            );
        }
    }
}

#[test]
fn blocks_copy_their_top_left_pixel() {
    // 200 is not a multiple of most block sizes, so trailing blocks are partial.
    let resolution = 200u64;
    let mut engine = FractalEngine::with_viewport(
        params(resolution, "sin_sqr"),
        ViewportState::new(Vector2::new(0.3, -0.2), 1.5).unwrap(),
    )
    .unwrap();
    let mut frame = FrameBuffer::new(200, 200, Color::TRANSPARENT);
    loop {
        let outcome = engine
            .render(&mut frame.as_pixel_buffer(), &mut NullTextSink)
            .unwrap();
        let FrameOutcome::Rendered(report) = outcome else {
            break;
        };
        let k = report.deterioration as u32;
        for y in 0..200 {
            for x in 0..200 {
                let top_left = frame.get(x - x % k, y - y % k);
                assert_eq!(frame.get(x, y), top_left, "block {k} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn default_scenario_is_point_symmetric() {
    // Resolution 1024, multiplier 1, zoom 0.5, offset 0, red mask on white.
    let p = params(1024, "sqr").with_depth_multiplier(1);
    assert_eq!(p.orbit, OrbitConvention::Sample);
    let mut engine = FractalEngine::new(p).unwrap();
    let mut frame = FrameBuffer::new(1024, 1024, Color::TRANSPARENT);
    run_to_convergence(&mut engine, &mut frame);

    for y in 1..1024 {
        for x in 1..1024 {
            assert_eq!(
                frame.get(x, y),
                frame.get(1024 - x, 1024 - y),
                "pixel ({x}, {y}) breaks point symmetry"
            );
        }
    }
    // Depth 2: only levels 0, 1 and 2 occur, so only white, the half-level
    // blend and opaque red appear.
    let half = fractalview_core::colorize(1, 2, p.color_mask, p.background_color);
    assert_eq!(half, Color(0xffbf_7f7f));
    for &c in &frame.pixels {
        assert!(
            c == Color::WHITE || c == half || c == p.color_mask,
            "unexpected color {c}"
        );
    }
}

#[test]
fn navigation_restarts_the_full_sequence() {
    let mut engine = FractalEngine::new(params(128, "sqr")).unwrap();
    let mut frame = FrameBuffer::new(128, 128, Color::TRANSPARENT);
    assert_eq!(run_to_convergence(&mut engine, &mut frame).len(), 7);

    assert!(engine.on_frame(&InputState::held(&[Direction::PanLeft])));
    assert!(engine.viewport().offset.x < 0.0);
    assert_eq!(run_to_convergence(&mut engine, &mut frame).len(), 7);
}

#[test]
fn still_render_matches_converged_interactive_render_at_same_depth() {
    // Multiplier 2 at zoom 0.5 gives depth 1, which the schedule raises to 2.
    let p = params(64, "sqr").with_depth_multiplier(2);
    let mut engine = FractalEngine::new(p).unwrap();
    let mut interactive = FrameBuffer::new(64, 64, Color::TRANSPARENT);
    run_to_convergence(&mut engine, &mut interactive);

    let mut still = FrameBuffer::new(64, 64, Color::TRANSPARENT);
    render_still(&p, 2, &mut still.as_pixel_buffer()).unwrap();
    assert_eq!(still.pixels, interactive.pixels);
}

#[test]
fn mandelbrot_orbit_shows_the_cardioid() {
    let p = params(64, "sqr").with_orbit(OrbitConvention::Mandelbrot);
    let mut frame = FrameBuffer::new(64, 64, Color::TRANSPARENT);
    render_still(&p, 256, &mut frame.as_pixel_buffer()).unwrap();
    // Pixel 32 maps to the origin, which never escapes; a corner escapes at once.
    assert_eq!(frame.get(32, 32), Some(p.color_mask));
    assert_ne!(frame.get(0, 0), Some(p.color_mask));
}
