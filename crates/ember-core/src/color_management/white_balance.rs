//! White balance via an approximate blackbody (Planckian) response.
//!
//! The target temperature's RGB response is divided by the response of the
//! 6500K neutral reference to get per-channel gains. The blackbody fit is
//! Tanner Helland's piecewise curve, evaluated on a temperature scale of
//! kelvin / 100.
//!
//! # Reference
//! Tanner Helland (2012) — "How to Convert Temperature (K) to RGB"

use crate::saturate;

/// Neutral reference temperature in kelvin (D65).
pub const NEUTRAL_KELVIN: f32 = 6500.0;

/// Below this temperature the red gain gets an extra warm boost.
const WARM_BOOST_BELOW: f32 = 3000.0;
/// Above this temperature the blue gain gets an extra cool boost.
const COOL_BOOST_ABOVE: f32 = 10000.0;
/// Floor for the neutral response when dividing.
const NEUTRAL_FLOOR: f32 = 0.001;

/// Approximate blackbody RGB response for `temp` in hundreds of kelvin.
///
/// ```text
/// red:   t <= 66 → 1
///        t >  66 → 329.698727446 × (t − 60)^−0.1332047592 / 255
/// green: t <= 66 → (99.4708025861 × ln(t) − 161.1195681661) / 255
///        t >  66 → 288.1221695283 × (t − 60)^−0.0755148492 / 255
/// blue:  t >= 66 → 1
///        t <= 19 → 0
///        else    → (138.5177312231 × ln(t − 10) − 305.0447927307) / 255
/// ```
///
/// Every branch is clamped to `[0, 1]`.
pub fn blackbody_response(temp: f32) -> [f32; 3] {
    let red = if temp <= 66.0 {
        1.0
    } else {
        saturate(329.698_727_446 * (temp - 60.0).powf(-0.133_204_759_2) / 255.0)
    };

    let green = if temp <= 66.0 {
        saturate((99.470_802_586_1 * temp.ln() - 161.119_568_166_1) / 255.0)
    } else {
        saturate(288.122_169_528_3 * (temp - 60.0).powf(-0.075_514_849_2) / 255.0)
    };

    let blue = if temp >= 66.0 {
        1.0
    } else if temp <= 19.0 {
        0.0
    } else {
        saturate((138.517_731_223_1 * (temp - 10.0).ln() - 305.044_792_730_7) / 255.0)
    };

    [red, green, blue]
}

/// Per-channel gains that move the 6500K neutral to `kelvin`.
///
/// Includes the empirical warm/cool boosts: the plain blackbody ratio pins
/// red at 1.0 for every warm temperature and blue at 1.0 for every cool one.
pub fn temperature_factors(kelvin: f32) -> [f32; 3] {
    let target = blackbody_response(kelvin / 100.0);
    let neutral = blackbody_response(NEUTRAL_KELVIN / 100.0);

    let mut factors = [0.0_f32; 3];
    for c in 0..3 {
        factors[c] = target[c] / neutral[c].max(NEUTRAL_FLOOR);
    }

    if kelvin < WARM_BOOST_BELOW {
        factors[0] *= 1.0 + (WARM_BOOST_BELOW - kelvin) / 10000.0;
    }
    if kelvin > COOL_BOOST_ABOVE {
        factors[2] *= 1.0 + (kelvin - COOL_BOOST_ABOVE) / 30000.0;
    }

    factors
}

/// Shift white balance to `kelvin`. 6500 is neutral, lower is warmer,
/// higher is cooler. Output is not clamped.
pub fn adjust_color_temperature(rgb: [f32; 3], kelvin: f32) -> [f32; 3] {
    let factors = temperature_factors(kelvin);
    [
        rgb[0] * factors[0],
        rgb[1] * factors[1],
        rgb[2] * factors[2],
    ]
}
