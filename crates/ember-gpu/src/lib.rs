//! Ember GPU — wgpu compute execution of the Ember color and SSAO math.
//!
//! Every per-pixel operator in `ember-core` has a WGSL twin here. The two
//! paths are expected to agree within floating-point tolerance; the
//! integration tests assert the same golden values against both.

pub mod brdf_pass;
pub mod buffers;
pub mod color_pass;
pub mod occlusion_pass;
pub mod pipeline;
pub mod readback;

use bytemuck::{Pod, Zeroable};
use ember_core::shading::SurfaceSample;
use ember_core::transform::params::GradingParams;

pub use brdf_pass::BrdfOp;
pub use color_pass::ColorOp;
pub use pipeline::GpuPostPipeline;

/// Features the Ember pipelines need from the device.
pub fn required_features() -> wgpu::Features {
    wgpu::Features::empty()
}

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("buffer mapping failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("buffer map callback was dropped")]
    MapCallbackDropped,
    #[error("{what}: expected a multiple of {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what}: {len} elements exceed the device limit of {max}")]
    TooLarge {
        what: &'static str,
        len: usize,
        max: u64,
    },
}

/// Invocations per workgroup in every Ember compute shader.
pub const WORKGROUP_SIZE: u32 = 256;

/// Workgroup grid covering `len` invocations.
///
/// Rows are filled up to the per-dimension limit before a second row is
/// started; shaders recover the flat index as
/// `gid.y * num_workgroups.x * WORKGROUP_SIZE + gid.x`.
pub fn dispatch_grid(len: u32, limits: &wgpu::Limits) -> Result<(u32, u32), GpuError> {
    let groups = len.div_ceil(WORKGROUP_SIZE);
    let max_per_dim = limits.max_compute_workgroups_per_dimension.max(1);
    if groups <= max_per_dim {
        return Ok((groups, 1));
    }
    let rows = groups.div_ceil(max_per_dim);
    if rows > max_per_dim {
        return Err(GpuError::TooLarge {
            what: "dispatch",
            len: len as usize,
            max: u64::from(max_per_dim) * u64::from(max_per_dim) * u64::from(WORKGROUP_SIZE),
        });
    }
    Ok((max_per_dim, rows))
}

/// `GradingParams` laid out for the `color_ops.wgsl` uniform.
///
/// Booleans become `u32` flags; the struct is 32 bytes, a multiple of the
/// 16-byte uniform alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct GradingParamsGpu {
    pub exposure: f32,
    pub temperature: f32,
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub tonemap: u32,
    pub gamma_encode: u32,
    pub pixel_count: u32,
}

impl GradingParamsGpu {
    pub fn from_params(params: &GradingParams, pixel_count: u32) -> Self {
        Self {
            exposure: params.exposure,
            temperature: params.temperature,
            saturation: params.saturation,
            contrast: params.contrast,
            brightness: params.brightness,
            tonemap: params.tonemap as u32,
            gamma_encode: params.gamma_encode as u32,
            pixel_count,
        }
    }
}

/// Uniform for `occlusion.wgsl`, padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct OcclusionParamsGpu {
    pub radius: f32,
    pub sample_count: u32,
    pub pixel_count: u32,
    pub _pad: u32,
}

/// One `brdf.wgsl` shading sample. Metalness and roughness ride in the
/// `w` lanes of the normal and view vectors.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SurfaceSampleGpu {
    pub normal_metalness: [f32; 4],
    pub view_roughness: [f32; 4],
    pub light: [f32; 4],
    pub albedo: [f32; 4],
}

impl SurfaceSampleGpu {
    pub fn from_sample(sample: &SurfaceSample) -> Self {
        Self {
            normal_metalness: sample.normal.extend(sample.metalness).to_array(),
            view_roughness: sample.view.extend(sample.roughness).to_array(),
            light: sample.light.extend(0.0).to_array(),
            albedo: sample.albedo.extend(0.0).to_array(),
        }
    }
}

/// Uniform for `brdf.wgsl`, padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BrdfParamsGpu {
    pub sample_count: u32,
    pub _pad: [u32; 3],
}
