/// Smallest iteration cap ever scheduled.
pub const MIN_DEPTH: u64 = 2;

/// Largest iteration cap ever scheduled.
pub const MAX_DEPTH: u64 = 1024;

/// Quantize a zoom-scaled depth multiplier to a power-of-two iteration cap.
///
/// Returns the smallest power of two in `2..=1024` that is `>= multiplier`,
/// clamped to `1024`. Inputs below 2 (including NaN) map to 2.
pub fn depth_for(multiplier: f64) -> u64 {
    let mut depth = MIN_DEPTH;
    while depth < MAX_DEPTH && (depth as f64) < multiplier {
        depth <<= 1;
    }
    depth
}

/// Depth used for a frame at `zoom` with the configured `depth_multiplier`.
#[inline]
pub fn depth_for_zoom(depth_multiplier: u64, zoom: f64) -> u64 {
    depth_for(depth_multiplier as f64 * zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values() {
        assert_eq!(depth_for(0.0), 2);
        assert_eq!(depth_for(1.99), 2);
        assert_eq!(depth_for(2.0), 2);
        assert_eq!(depth_for(2.5), 4);
        assert_eq!(depth_for(4.0), 4);
        assert_eq!(depth_for(512.0), 512);
        assert_eq!(depth_for(513.0), 1024);
        assert_eq!(depth_for(1024.0), 1024);
        assert_eq!(depth_for(1025.0), 1024);
        assert_eq!(depth_for(f64::INFINITY), 1024);
    }

    #[test]
    fn negative_and_nan_clamp_to_floor() {
        assert_eq!(depth_for(-5.0), 2);
        assert_eq!(depth_for(f64::NAN), 2);
    }

    #[test]
    fn schedule_is_monotone_and_quantized() {
        let mut previous = 0;
        let mut m = 0.0;
        while m < 3000.0 {
            let d = depth_for(m);
            assert!(d >= previous, "depth_for({m}) = {d} < {previous}");
            assert!(d.is_power_of_two() && (MIN_DEPTH..=MAX_DEPTH).contains(&d));
            previous = d;
            m += 0.75;
        }
    }

    #[test]
    fn zoom_scales_multiplier() {
        // Default session: multiplier 32 at zoom 0.5.
        assert_eq!(depth_for_zoom(32, 0.5), 16);
        assert_eq!(depth_for_zoom(32, 0.5 / 0.9), 32);
    }
}
