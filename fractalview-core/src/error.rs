use thiserror::Error;

/// Errors originating from the core fractal engine.
///
/// All of these are configuration errors: the numerical code itself is total.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("complex function with name '{0}' not found")]
    UnknownFunction(String),

    #[error("unknown orbit convention '{0}' (expected 'sample' or 'mandelbrot')")]
    UnknownOrbit(String),

    #[error("invalid color '{0}' (expected 0xAARRGGBB)")]
    InvalidColor(String),

    #[error("invalid zoom: {0} (must be positive and finite)")]
    InvalidZoom(f64),
}
