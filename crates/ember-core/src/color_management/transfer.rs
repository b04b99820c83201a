//! Display gamma transfer (pure power 2.2).
//!
//! Converts between linear light and the gamma-encoded values sent to the
//! display. Inputs are not clamped: a negative channel raised to a fractional
//! power yields NaN, so HDR values must be clamped (or tonemapped) first.

/// Display gamma exponent.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// A transfer function that converts between linear and non-linear encodings.
pub trait TransferFunction: Send + Sync {
    /// Convert from non-linear (encoded) to linear light.
    fn to_linear(&self, encoded: f32) -> f32;

    /// Convert from linear light to non-linear (encoded).
    fn to_encoded(&self, linear: f32) -> f32;
}

/// Pure power-law gamma 2.2.
///
/// ```text
/// to_encoded: L^(1/2.2)
/// to_linear:  V^2.2
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Gamma22Transfer;

impl TransferFunction for Gamma22Transfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        encoded.powf(DISPLAY_GAMMA)
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        linear.powf(1.0 / DISPLAY_GAMMA)
    }
}

/// Encode a linear color for display, per channel `c^(1/2.2)`.
pub fn linear_to_gamma(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| Gamma22Transfer.to_encoded(c))
}

/// Decode a gamma-encoded color to linear light, per channel `c^2.2`.
pub fn gamma_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|c| Gamma22Transfer.to_linear(c))
}
