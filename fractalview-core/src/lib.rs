pub mod color;
pub mod complex;
pub mod depth;
pub mod error;
pub mod escape;
pub mod functions;
pub mod viewport;

// Re-export primary types for convenience.
pub use color::{colorize, Color};
pub use complex::Complex;
pub use depth::{depth_for, depth_for_zoom};
pub use error::CoreError;
pub use escape::{escape_level, OrbitConvention};
pub use functions::ComplexFn;
pub use viewport::{Vector2, ViewportState};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
