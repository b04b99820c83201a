//! Parameter structs for grading and SSAO.
//!
//! `GradingParams` is the single source of truth for the per-pixel grade;
//! the GPU uniform is packed from it. `SsaoParams` carries the scalar SSAO
//! settings the renderer feeds to the occlusion pass. Both deserialize from
//! partial JSON, filling missing fields from `Default`.

use serde::{Deserialize, Serialize};

use crate::color_management::white_balance::NEUTRAL_KELVIN;
use crate::error::CoreError;
use crate::ssao::kernel::MAX_SHADER_SAMPLES;

/// Fewest kernel samples the SSAO pass will run with.
pub const MIN_SSAO_SAMPLES: u32 = 4;
/// Most kernel samples the SSAO pass will run with.
pub const MAX_SSAO_SAMPLES: u32 = MAX_SHADER_SAMPLES as u32;

/// Per-pixel grading settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingParams {
    /// Exposure in stops. 0.0 = neutral.
    pub exposure: f32,
    /// White balance target in kelvin. 6500.0 = neutral.
    pub temperature: f32,
    /// Saturation multiplier. 1.0 = neutral.
    pub saturation: f32,
    /// Contrast multiplier around 0.5. 1.0 = neutral.
    pub contrast: f32,
    /// Brightness multiplier. 1.0 = neutral.
    pub brightness: f32,
    /// Apply the ACES filmic tone curve after exposure and white balance.
    pub tonemap: bool,
    /// Encode the result with display gamma 2.2.
    pub gamma_encode: bool,
}

impl Default for GradingParams {
    /// Neutral sliders; tonemap and gamma on.
    fn default() -> Self {
        Self {
            exposure: 0.0,
            temperature: NEUTRAL_KELVIN,
            saturation: 1.0,
            contrast: 1.0,
            brightness: 1.0,
            tonemap: true,
            gamma_encode: true,
        }
    }
}

impl GradingParams {
    /// Parse from JSON; absent fields take their default.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Neutral sliders with tonemap and gamma disabled: a true identity.
    pub fn identity() -> Self {
        Self {
            tonemap: false,
            gamma_encode: false,
            ..Self::default()
        }
    }
}

/// SSAO pass settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsaoParams {
    /// View-space sampling radius.
    pub radius: f32,
    /// Occlusion strength multiplier applied by the composite.
    pub intensity: f32,
    /// Depth bias against self-occlusion.
    pub bias: f32,
    /// Requested kernel sample count, clamped to `[4, 64]` on use.
    pub samples: u32,
}

impl Default for SsaoParams {
    fn default() -> Self {
        Self {
            radius: 0.5,
            intensity: 1.0,
            bias: 0.025,
            samples: 16,
        }
    }
}

impl SsaoParams {
    /// Parse from JSON and validate.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reject settings the occlusion pass cannot use.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(CoreError::InvalidParameter {
                name: "radius",
                reason: format!("must be finite and non-negative, got {}", self.radius),
            });
        }
        if !self.intensity.is_finite() {
            return Err(CoreError::InvalidParameter {
                name: "intensity",
                reason: format!("must be finite, got {}", self.intensity),
            });
        }
        Ok(())
    }

    /// Effective kernel sample count, clamped to `[4, 64]`.
    pub fn sample_count(&self) -> usize {
        let clamped = self.samples.clamp(MIN_SSAO_SAMPLES, MAX_SSAO_SAMPLES);
        if clamped != self.samples {
            tracing::warn!(
                requested = self.samples,
                clamped,
                "SSAO sample count out of range"
            );
        }
        clamped as usize
    }

    /// `[radius, intensity, bias, samples]` as one `vec4` constant.
    pub fn shader_constants(&self) -> [f32; 4] {
        [
            self.radius,
            self.intensity,
            self.bias,
            self.sample_count() as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let params = GradingParams::from_json(r#"{ "exposure": 1.5, "tonemap": false }"#).unwrap();
        assert_eq!(params.exposure, 1.5);
        assert!(!params.tonemap);
        assert_eq!(params.temperature, 6500.0);
        assert!(params.gamma_encode);
    }

    #[test]
    fn test_grading_params_roundtrip_json() {
        let params = GradingParams {
            saturation: 0.25,
            ..GradingParams::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(GradingParams::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            GradingParams::from_json("{ exposure: }"),
            Err(CoreError::Json(_))
        ));
    }

    #[test]
    fn test_sample_count_is_clamped() {
        let count = |samples: u32| SsaoParams { samples, ..SsaoParams::default() }.sample_count();
        assert_eq!(count(0), 4);
        assert_eq!(count(3), 4);
        assert_eq!(count(16), 16);
        assert_eq!(count(64), 64);
        assert_eq!(count(500), 64);
    }

    #[test]
    fn test_ssao_shader_constants() {
        let params = SsaoParams::from_json(r#"{ "radius": 1.0, "samples": 128 }"#).unwrap();
        assert_eq!(params.shader_constants(), [1.0, 1.0, 0.025, 64.0]);
    }

    #[test]
    fn test_negative_radius_is_rejected() {
        assert!(matches!(
            SsaoParams::from_json(r#"{ "radius": -1.0 }"#),
            Err(CoreError::InvalidParameter { name: "radius", .. })
        ));
    }
}
