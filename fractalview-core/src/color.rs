use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    pub const BLACK: Self = Self(0xff00_0000);
    pub const WHITE: Self = Self(0xffff_ffff);

    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Multiply all four channels by `coef` (clamped to `[0, 1]`).
    #[inline]
    pub fn scaled(self, coef: f64) -> Self {
        let coef = coef.clamp(0.0, 1.0);
        let s = |c: u8| (c as f64 * coef).round() as u8;
        Self::from_argb(s(self.alpha()), s(self.red()), s(self.green()), s(self.blue()))
    }

    /// Straight-alpha source-over composite of `self` onto `dst`.
    #[inline]
    pub fn over(self, dst: Color) -> Self {
        let sa = self.alpha() as f64 / 255.0;
        let da = dst.alpha() as f64 / 255.0 * (1.0 - sa);
        let out_a = sa + da;
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let mix = |s: u8, d: u8| ((s as f64 * sa + d as f64 * da) / out_a).round().min(255.0) as u8;
        Self::from_argb(
            (out_a * 255.0).round() as u8,
            mix(self.red(), dst.red()),
            mix(self.green(), dst.green()),
            mix(self.blue(), dst.blue()),
        )
    }

    /// `[r, g, b, a]` byte order, as expected by RGBA image encoders.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Parses `0xAARRGGBB`, `#AARRGGBB` or bare hex. Six-digit forms are opaque.
impl std::str::FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let hex = t
            .strip_prefix("0x")
            .or_else(|| t.strip_prefix("0X"))
            .or_else(|| t.strip_prefix('#'))
            .unwrap_or(t);
        let invalid = || CoreError::InvalidColor(s.to_string());
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            8 => Ok(Self(value)),
            6 => Ok(Self(0xff00_0000 | value)),
            _ => Err(invalid()),
        }
    }
}

/// Map an escape level to a color: all four channels of the mask scaled by
/// `level / depth`, then composited over `background`.
///
/// Level 0 gives `background`; level = depth gives the mask drawn over it.
///
/// `depth` is never 0 when it comes from the depth schedule.
#[inline]
pub fn colorize(level: u64, depth: u64, mask: Color, background: Color) -> Color {
    debug_assert!(depth > 0);
    let coef = level as f64 / depth as f64;
    mask.scaled(coef).over(background)
}
