//! Ember Core — reference math for color grading, SSAO sampling and shading.
//!
//! This crate contains the tone curve, gamma conversion, grading operators,
//! the white balance model, the SSAO kernel/noise/occlusion math and the
//! Cook-Torrance BRDF. No GPU dependencies; `ember-gpu` runs the same
//! formulas per pixel and is tested against the values produced here.

pub mod color_management;
pub mod error;
pub mod grading;
pub mod shading;
pub mod ssao;
pub mod transform;

// Re-exports for convenience.
pub use error::CoreError;
pub use ssao::kernel::Kernel;
pub use shading::SurfaceSample;
pub use ssao::noise::NoiseTile;
pub use transform::evaluate::evaluate_transform;
pub use transform::params::{GradingParams, SsaoParams};

/// Clamp to `[0, 1]`. NaN collapses to 0.
#[inline]
pub(crate) fn saturate(value: f32) -> f32 {
    value.max(0.0).min(1.0)
}
