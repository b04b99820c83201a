//! Core transform evaluation — applies the full grading chain to a single pixel.

use crate::color_management::aces::aces_film;
use crate::color_management::transfer::linear_to_gamma;
use crate::color_management::white_balance::adjust_color_temperature;
use crate::grading::sliders::{
    adjust_brightness, adjust_contrast, adjust_exposure, adjust_saturation,
};
use crate::transform::params::GradingParams;

/// The core function. GPU `color_ops.wgsl` (`grade`) mirrors this exactly.
///
/// 1. Exposure (scene-linear)
/// 2. White balance
/// 3. ACES tone curve (if `params.tonemap`)
/// 4. Saturation
/// 5. Contrast (saturating)
/// 6. Brightness (saturating)
/// 7. Display gamma (if `params.gamma_encode`)
///
/// Steps 5 and 6 clamp to `[0, 1]`, so the gamma step never sees a negative
/// base.
pub fn evaluate_transform(rgb: [f32; 3], params: &GradingParams) -> [f32; 3] {
    let mut out = adjust_exposure(rgb, params.exposure);
    out = adjust_color_temperature(out, params.temperature);
    if params.tonemap {
        out = aces_film(out);
    }
    out = adjust_saturation(out, params.saturation);
    out = adjust_contrast(out, params.contrast);
    out = adjust_brightness(out, params.brightness);
    if params.gamma_encode {
        out = linear_to_gamma(out);
    }
    out
}
