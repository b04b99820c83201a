//! GPU compute pass evaluating the Cook-Torrance BRDF per shading sample.
//!
//! `brdf.wgsl` exposes one entry point per quantity. Each writes one
//! `vec4<f32>` per sample: RGB terms carry `w = 1`, the environment BRDF
//! writes `(scale, bias, 0, 0)`.

use std::num::NonZeroU64;

use crate::buffers::GpuArrayHandle;
use crate::{BrdfParamsGpu, SurfaceSampleGpu};
use crate::{GpuError, dispatch_grid};

/// Which BRDF quantity to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrdfOp {
    /// `(diffuse + specular) × saturate(n·l)` for a unit light.
    DirectLighting,
    /// Cook-Torrance specular term alone.
    Specular,
    /// Schlick Fresnel at the half vector.
    Fresnel,
    /// Analytic environment BRDF `(scale, bias)`.
    EnvBrdf,
}

impl BrdfOp {
    pub const ALL: [BrdfOp; 4] = [
        BrdfOp::DirectLighting,
        BrdfOp::Specular,
        BrdfOp::Fresnel,
        BrdfOp::EnvBrdf,
    ];

    /// Shader entry point name.
    pub const fn entry_point(self) -> &'static str {
        match self {
            Self::DirectLighting => "direct_lighting",
            Self::Specular => "specular",
            Self::Fresnel => "fresnel",
            Self::EnvBrdf => "env_brdf",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Manages the `brdf.wgsl` compute pipelines and their uniform.
pub struct BrdfPass {
    pipelines: [wgpu::ComputePipeline; BrdfOp::ALL.len()],
    bind_group_layout: wgpu::BindGroupLayout,
    params_buffer: wgpu::Buffer,
}

impl BrdfPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("ember_brdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/brdf.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember_brdf_layout"),
            entries: &[
                // binding 0: shading samples
                storage_entry(0, true, std::mem::size_of::<SurfaceSampleGpu>() as u64),
                // binding 1: results
                storage_entry(1, false, 16),
                // binding 2: params uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(
                            std::mem::size_of::<BrdfParamsGpu>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ember_brdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = BrdfOp::ALL.map(|op| {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&format!("ember_brdf_{}_pipeline", op.entry_point())),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(op.entry_point()),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
        });

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember_brdf_params_uniform"),
            size: std::mem::size_of::<BrdfParamsGpu>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipelines,
            bind_group_layout,
            params_buffer,
        }
    }

    /// Dispatch `op` over every sample in `samples`, writing into `output`.
    ///
    /// The caller is responsible for submitting the encoder.
    pub fn dispatch(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        op: BrdfOp,
        samples: &GpuArrayHandle,
        output: &GpuArrayHandle,
        encoder: &mut wgpu::CommandEncoder,
    ) -> Result<(), GpuError> {
        let (groups_x, groups_y) = dispatch_grid(samples.len, &device.limits())?;
        let params = BrdfParamsGpu {
            sample_count: samples.len,
            _pad: [0; 3],
        };
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ember_brdf_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: samples.buffer.as_entire_binding(),
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
            label: Some("ember_brdf_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipelines[op.index()]);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
        Ok(())
    }
}

fn storage_entry(binding: u32, read_only: bool, min_size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(min_size),
        },
        count: None,
    }
}
