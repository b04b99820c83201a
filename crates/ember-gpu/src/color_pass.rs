//! GPU compute pass running the per-pixel color operators.
//!
//! `color_ops.wgsl` holds one entry point per operator. All of them share
//! one bind group layout: source pixels, destination pixels, and the
//! `GradingParamsGpu` uniform.

use std::num::NonZeroU64;

use ember_core::transform::params::GradingParams;

use crate::GradingParamsGpu;
use crate::buffers::GpuArrayHandle;
use crate::{GpuError, dispatch_grid};

/// A single color operator, or the full grading chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorOp {
    /// ACES filmic tone curve.
    Aces,
    /// Display gamma encode (`c^(1/2.2)`).
    LinearToGamma,
    /// Display gamma decode (`c^2.2`).
    GammaToLinear,
    /// `2^exposure` gain.
    Exposure,
    /// Rec. 709 saturation.
    Saturation,
    /// Contrast around 0.5, saturating.
    Contrast,
    /// Brightness multiplier, saturating.
    Brightness,
    /// Blackbody white balance to `temperature` kelvin.
    ColorTemperature,
    /// The full chain, mirroring `ember_core::evaluate_transform`.
    Grade,
}

impl ColorOp {
    pub const ALL: [ColorOp; 9] = [
        ColorOp::Aces,
        ColorOp::LinearToGamma,
        ColorOp::GammaToLinear,
        ColorOp::Exposure,
        ColorOp::Saturation,
        ColorOp::Contrast,
        ColorOp::Brightness,
        ColorOp::ColorTemperature,
        ColorOp::Grade,
    ];

    /// Shader entry point name.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Self::Aces => "tonemap_aces",
            Self::LinearToGamma => "linear_to_gamma",
            Self::GammaToLinear => "gamma_to_linear",
            Self::Exposure => "exposure",
            Self::Saturation => "saturation",
            Self::Contrast => "contrast",
            Self::Brightness => "brightness",
            Self::ColorTemperature => "color_temperature",
            Self::Grade => "grade",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Manages the `color_ops.wgsl` compute pipelines and their uniform.
pub struct ColorPass {
    pipelines: [wgpu::ComputePipeline; ColorOp::ALL.len()],
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
}

impl ColorPass {
    /// Compile `color_ops.wgsl` and build one pipeline per operator.
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ember_color_ops_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/color_ops.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember_color_ops_layout"),
            entries: &[
                // binding 0: source pixels
                storage_entry(0, true),
                // binding 1: destination pixels
                storage_entry(1, false),
                // binding 2: params uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<GradingParamsGpu>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ember_color_ops_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = ColorOp::ALL.map(|op| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&format!("ember_{}_pipeline", op.entry_point())),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(op.entry_point()),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember_color_params_uniform"),
            size: std::mem::size_of::<GradingParamsGpu>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipelines,
            bind_group_layout,
            params_buffer,
        }
    }

    /// Dispatch `op` over every pixel of `source`, writing into `output`.
    ///
    /// The caller is responsible for submitting the encoder.
    #[allow(clippy::too_many_arguments)]
    pub fn dispatch(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        op: ColorOp,
        params: &GradingParams,
        source: &GpuArrayHandle,
        output: &GpuArrayHandle,
        encoder: &mut wgpu::CommandEncoder,
    ) -> Result<(), GpuError> {
        let (groups_x, groups_y) = dispatch_grid(source.len, &device.limits())?;
        let gpu_params = GradingParamsGpu::from_params(params, source.len);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&gpu_params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ember_color_ops_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: source.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output.buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("ember_color_ops_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipelines[op.index()]);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
        Ok(())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(16),
        },
        count: None,
    }
}
