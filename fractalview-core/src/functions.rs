//! Named table of iteration functions.
//!
//! Names are resolved once at configuration time; the engine only ever
//! holds the resulting [`ComplexFn`] pointer.

use crate::complex::Complex;
use crate::error::CoreError;

/// A pure unary complex function used as the iteration map.
pub type ComplexFn = fn(Complex) -> Complex;

/// Name of the function used when none is configured.
pub const DEFAULT_FUNCTION: &str = "sqr";

fn identity(z: Complex) -> Complex {
    z
}

fn sqr(z: Complex) -> Complex {
    z.sqr()
}

fn sin(z: Complex) -> Complex {
    z.sin()
}

fn cos(z: Complex) -> Complex {
    z.cos()
}

fn sin_sqr(z: Complex) -> Complex {
    z.sqr().sin()
}

fn cos_sqr(z: Complex) -> Complex {
    z.sqr().cos()
}

fn tan_sqr(z: Complex) -> Complex {
    z.sqr().tan()
}

fn asin_sqr(z: Complex) -> Complex {
    z.sqr().asin()
}

fn log_sqr(z: Complex) -> Complex {
    z.sqr().ln()
}

fn exp_sqr(z: Complex) -> Complex {
    z.sqr().exp()
}

fn sigm_sqr(z: Complex) -> Complex {
    z.sqr().sigmoid()
}

fn sgn_sqr(z: Complex) -> Complex {
    z.sqr().signum()
}

/// `z²` quantized to a grid of `1/STEPS` along both axes.
fn floor_sqr<const STEPS: u32>(z: Complex) -> Complex {
    let steps = STEPS as f64;
    (z.sqr() * steps).floor() / steps
}

/// Sorted by name so listings are stable.
static FUNCTIONS: &[(&str, ComplexFn)] = &[
    ("asin_sqr", asin_sqr),
    ("cos", cos),
    ("cos_sqr", cos_sqr),
    ("exp_sqr", exp_sqr),
    ("floor16_sqr", floor_sqr::<16>),
    ("floor2_sqr", floor_sqr::<2>),
    ("floor32_sqr", floor_sqr::<32>),
    ("floor4_sqr", floor_sqr::<4>),
    ("floor8_sqr", floor_sqr::<8>),
    ("log_sqr", log_sqr),
    ("sgn_sqr", sgn_sqr),
    ("sigm_sqr", sigm_sqr),
    ("sin", sin),
    ("sin_sqr", sin_sqr),
    ("sqr", sqr),
    ("tan_sqr", tan_sqr),
    ("x", identity),
];

/// Look up a function by name.
pub fn lookup(name: &str) -> Option<ComplexFn> {
    FUNCTIONS
        .binary_search_by(|(n, _)| (*n).cmp(name))
        .ok()
        .map(|i| FUNCTIONS[i].1)
}

/// Like [`lookup`] but reports unknown names as a configuration error.
pub fn resolve(name: &str) -> crate::Result<ComplexFn> {
    lookup(name).ok_or_else(|| CoreError::UnknownFunction(name.to_string()))
}

/// All registered names in sorted order.
pub fn names() -> impl Iterator<Item = &'static str> {
    FUNCTIONS.iter().map(|(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        let listed: Vec<_> = names().collect();
        let mut sorted = listed.clone();
        sorted.sort_unstable();
        assert_eq!(listed, sorted);
    }

    #[test]
    fn every_name_resolves() {
        for name in names() {
            assert!(lookup(name).is_some(), "{name} should resolve");
        }
        assert_eq!(names().count(), 17);
    }

    #[test]
    fn default_is_registered() {
        let f = resolve(DEFAULT_FUNCTION).unwrap();
        assert_eq!(f(Complex::new(1.0, 1.0)), Complex::new(0.0, 2.0));
    }

    #[test]
    fn unknown_name_is_error() {
        match resolve("cube") {
            Err(CoreError::UnknownFunction(name)) => assert_eq!(name, "cube"),
            other => panic!("expected UnknownFunction, got {other:?}"),
        }
    }

    #[test]
    fn floor_quantizes_to_grid() {
        let f = lookup("floor4_sqr").unwrap();
        // (0.6)² = 0.36 → floor(1.44) / 4 = 0.25
        let w = f(Complex::new(0.6, 0.0));
        assert_eq!(w, Complex::new(0.25, 0.0));
    }

    #[test]
    fn identity_is_identity() {
        let f = lookup("x").unwrap();
        let z = Complex::new(-0.3, 0.9);
        assert_eq!(f(z), z);
    }
}
