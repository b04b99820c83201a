//! ACES filmic tone curve (Narkowicz 2015 fit).
//!
//! Maps unbounded scene-linear values into `[0, 1]` with a cheap rational
//! polynomial that approximates the ACES RRT/ODT shoulder and toe.
//!
//! ```text
//! x'  = max(x, 0)
//! out = saturate((x' × (a·x' + b)) / (x' × (c·x' + d) + e))
//! ```

const A: f32 = 2.51;
const B: f32 = 0.03;
const C: f32 = 2.43;
const D: f32 = 0.59;
const E: f32 = 0.14;

/// Tonemap a single channel.
#[inline]
pub fn aces_film_channel(x: f32) -> f32 {
    let x = x.max(0.0);
    crate::saturate((x * (A * x + B)) / (x * (C * x + D) + E))
}

/// Tonemap an HDR color into displayable `[0, 1]` range, per channel.
///
/// Negative channels are clamped to zero before the curve is applied.
pub fn aces_film(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(aces_film_channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aces_black_is_black() {
        assert_eq!(aces_film([0.0; 3]), [0.0; 3]);
    }

    #[test]
    fn test_aces_reference_values() {
        for (input, expected) in [(0.18, 0.267), (0.5, 0.616), (2.0, 0.923)] {
            let out = aces_film([input; 3]);
            for c in out {
                assert!(
                    (c - expected).abs() < 0.01,
                    "aces({input}) = {c}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn test_aces_monotonic_over_hdr_range() {
        let mut prev = 0.0_f32;
        for i in 0..=100 {
            let x = i as f32 * 0.1;
            let out = aces_film([x; 3]);
            assert!(out[0] >= prev, "not monotonic at {x}: {} < {prev}", out[0]);
            assert_eq!(out[0], out[1]);
            assert_eq!(out[1], out[2]);
            prev = out[0];
        }
    }

    #[test]
    fn test_aces_extreme_values_saturate() {
        for c in aces_film([1000.0; 3]) {
            assert!((c - 1.0).abs() < 0.01);
            assert!(c <= 1.0);
        }
        for c in aces_film([10.0; 3]) {
            assert!((c - 1.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_aces_negative_clamps_to_zero() {
        assert_eq!(aces_film([-1.0, -0.5, -0.1]), [0.0; 3]);
    }

    #[test]
    fn test_aces_channels_are_independent() {
        let out = aces_film([1.0, 0.5, 0.0]);
        assert!(out[0] > out[1]);
        assert!(out[1] > out[2]);
        assert_eq!(out[2], 0.0);
        assert!(aces_film([0.001; 3])[0] > 0.0);
    }
}
