use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::functions::ComplexFn;

/// Orbits whose squared norm exceeds this have escaped (`|z| > 2`).
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// How the orbit of a sample is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitConvention {
    /// `z₀ = sample`, `z ← f(z)`.
    #[default]
    Sample,
    /// `z₀ = 0`, `z ← f(z) + sample`. With `f = z²` this is the Mandelbrot set.
    Mandelbrot,
}

impl OrbitConvention {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Mandelbrot => "mandelbrot",
        }
    }
}

impl std::str::FromStr for OrbitConvention {
    type Err = crate::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sample" => Ok(Self::Sample),
            "mandelbrot" => Ok(Self::Mandelbrot),
            other => Err(crate::CoreError::UnknownOrbit(other.to_string())),
        }
    }
}

/// Escape-time level of `sample`: the number of applications of `f` before
/// the orbit leaves the radius-2 disk, capped at `depth`.
///
/// Non-finite iterates (e.g. `ln(0)`) count as escaped.
#[inline]
pub fn escape_level(sample: Complex, depth: u64, f: ComplexFn, orbit: OrbitConvention) -> u64 {
    match orbit {
        OrbitConvention::Sample => {
            let mut z = sample;
            for n in 0..depth {
                z = f(z);
                if escaped(z) {
                    return n;
                }
            }
        }
        OrbitConvention::Mandelbrot => {
            let mut z = Complex::ZERO;
            for n in 0..depth {
                z = f(z) + sample;
                if escaped(z) {
                    return n;
                }
            }
        }
    }
    depth
}

#[inline(always)]
fn escaped(z: Complex) -> bool {
    let norm_sq = z.norm_sq();
    norm_sq > ESCAPE_RADIUS_SQ || norm_sq.is_nan()
}
