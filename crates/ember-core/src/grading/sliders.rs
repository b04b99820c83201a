//! Slider-based grading adjustments (exposure, saturation, contrast, brightness).

use crate::saturate;

/// Rec. 709 luminance weights. These define the grayscale axis.
pub const LUMA_REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Fixed contrast pivot.
pub const CONTRAST_PIVOT: f32 = 0.5;

/// Rec. 709 luminance of a linear color.
#[inline]
pub fn luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * LUMA_REC709[0] + rgb[1] * LUMA_REC709[1] + rgb[2] * LUMA_REC709[2]
}

/// Apply exposure in photographic stops.
///
/// ```text
/// out = in × 2^ev
/// ```
///
/// Not clamped; the tone curve downstream handles values above 1.
pub fn adjust_exposure(rgb: [f32; 3], ev: f32) -> [f32; 3] {
    let multiplier = ev.exp2();
    rgb.map(|c| c * multiplier)
}

/// Scale chroma relative to Rec. 709 luminance.
///
/// ```text
/// luma = dot(rgb, rec709_weights)
/// out  = luma + (rgb − luma) × saturation
/// ```
///
/// `0.0` is grayscale, `1.0` is identity, values above 1 extrapolate
/// without clamping.
pub fn adjust_saturation(rgb: [f32; 3], saturation: f32) -> [f32; 3] {
    let luma = luminance(rgb);
    rgb.map(|c| luma + saturation * (c - luma))
}

/// Apply linear contrast around the 0.5 pivot, saturating the result.
///
/// ```text
/// out = saturate((in − 0.5) × contrast + 0.5)
/// ```
pub fn adjust_contrast(rgb: [f32; 3], contrast: f32) -> [f32; 3] {
    rgb.map(|c| saturate((c - CONTRAST_PIVOT) * contrast + CONTRAST_PIVOT))
}

/// Scale all channels uniformly, saturating the result.
pub fn adjust_brightness(rgb: [f32; 3], brightness: f32) -> [f32; 3] {
    rgb.map(|c| saturate(c * brightness))
}
