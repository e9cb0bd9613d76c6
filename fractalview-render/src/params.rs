use fractalview_core::functions::{self, ComplexFn, DEFAULT_FUNCTION};
use fractalview_core::{Color, OrbitConvention};

use crate::error::RenderError;
use crate::strategy::ComputeMode;

/// Everything that stays fixed for one engine session.
///
/// Names (function, compute mode) are resolved before these are built; the
/// engine only sees the resolved values.
#[derive(Debug, Clone, Copy)]
pub struct RenderParameters {
    /// Side of the square logical image, in pixels.
    pub resolution: u64,
    /// Scaled by zoom, then quantized, to choose the iteration cap.
    pub depth_multiplier: u64,
    pub color_mask: Color,
    pub background_color: Color,
    pub function: ComplexFn,
    pub orbit: OrbitConvention,
    pub compute_mode: ComputeMode,
}

impl RenderParameters {
    pub const DEFAULT_RESOLUTION: u64 = 1024;
    pub const DEFAULT_DEPTH_MULTIPLIER: u64 = 32;
    pub const DEFAULT_COLOR_MASK: Color = Color(0xffff_0000);
    pub const DEFAULT_BACKGROUND: Color = Color(0xffff_ffff);

    pub fn new(resolution: u64, function: ComplexFn) -> crate::Result<Self> {
        if resolution == 0 {
            return Err(RenderError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution,
            depth_multiplier: Self::DEFAULT_DEPTH_MULTIPLIER,
            color_mask: Self::DEFAULT_COLOR_MASK,
            background_color: Self::DEFAULT_BACKGROUND,
            function,
            orbit: OrbitConvention::default(),
            compute_mode: ComputeMode::default(),
        })
    }

    /// Resolve a function by name and build parameters around it.
    pub fn with_function_name(resolution: u64, name: &str) -> crate::Result<Self> {
        Self::new(resolution, functions::resolve(name)?)
    }

    pub fn with_depth_multiplier(self, depth_multiplier: u64) -> Self {
        Self {
            depth_multiplier,
            ..self
        }
    }

    pub fn with_colors(self, color_mask: Color, background_color: Color) -> Self {
        Self {
            color_mask,
            background_color,
            ..self
        }
    }

    pub fn with_orbit(self, orbit: OrbitConvention) -> Self {
        Self { orbit, ..self }
    }

    pub fn with_compute_mode(self, compute_mode: ComputeMode) -> Self {
        Self {
            compute_mode,
            ..self
        }
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            resolution: Self::DEFAULT_RESOLUTION,
            depth_multiplier: Self::DEFAULT_DEPTH_MULTIPLIER,
            color_mask: Self::DEFAULT_COLOR_MASK,
            background_color: Self::DEFAULT_BACKGROUND,
            function: functions::lookup(DEFAULT_FUNCTION).unwrap_or(|z| z.sqr()),
            orbit: OrbitConvention::default(),
            compute_mode: ComputeMode::default(),
        }
    }
}
