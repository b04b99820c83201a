//! Top-level GPU post-processing pipeline: upload → dispatch → readback.

use std::sync::Arc;

use ember_core::shading::SurfaceSample;
use ember_core::transform::params::GradingParams;
use parking_lot::Mutex;

use crate::brdf_pass::{BrdfOp, BrdfPass};
use crate::buffers::GpuArrayHandle;
use crate::{GpuError, SurfaceSampleGpu};
use crate::color_pass::{ColorOp, ColorPass};
use crate::occlusion_pass::OcclusionPass;
use crate::readback;

/// Runs the color operators, the occlusion estimate and the shading BRDF
/// on the GPU.
///
/// Calls are serialized on an internal lock that also guards the cached
/// readback staging buffer, so the pipeline can be shared across threads.
pub struct GpuPostPipeline {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    color_pass: ColorPass,
    occlusion_pass: OcclusionPass,
    brdf_pass: BrdfPass,
    staging: Mutex<Option<wgpu::Buffer>>,
}

impl GpuPostPipeline {
    /// Create a pipeline on an existing device and queue.
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let color_pass = ColorPass::new(&device);
        let occlusion_pass = OcclusionPass::new(&device);
        let brdf_pass = BrdfPass::new(&device);
        Self {
            device,
            queue,
            color_pass,
            occlusion_pass,
            brdf_pass,
            staging: Mutex::new(None),
        }
    }

    /// Request an adapter and device and build the pipeline on them.
    /// Blocks the calling thread.
    pub fn create_blocking() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            ..Default::default()
        }))?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = ?info.backend,
            "creating Ember GPU pipeline"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("ember_device"),
            required_features: crate::required_features(),
            required_limits: adapter.limits(),
            ..Default::default()
        }))?;

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    /// Apply a color operator to RGBA pixels. Alpha passes through.
    ///
    /// Inputs larger than one storage binding on this device fail with
    /// [`GpuError::TooLarge`].
    pub fn apply(
        &self,
        op: ColorOp,
        pixels: &[[f32; 4]],
        params: &GradingParams,
    ) -> Result<Vec<[f32; 4]>, GpuError> {
        if pixels.is_empty() {
            return Ok(Vec::new());
        }
        let mut staging = self.staging.lock();

        let source = GpuArrayHandle::upload(&self.device, "ember_color_source", pixels)?;
        let output =
            GpuArrayHandle::create_output::<[f32; 4]>(&self.device, "ember_color_output", source.len);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember_color_encoder"),
            });
        self.color_pass.dispatch(
            &self.device,
            &self.queue,
            op,
            params,
            &source,
            &output,
            &mut encoder,
        )?;
        self.queue.submit(std::iter::once(encoder.finish()));

        readback::download(&self.device, &self.queue, &output, &mut staging)
    }

    /// [`apply`](Self::apply) for RGB pixels, padding alpha to 1.
    pub fn apply_rgb(
        &self,
        op: ColorOp,
        pixels: &[[f32; 3]],
        params: &GradingParams,
    ) -> Result<Vec<[f32; 3]>, GpuError> {
        let rgba: Vec<[f32; 4]> = pixels.iter().map(|&[r, g, b]| [r, g, b, 1.0]).collect();
        let out = self.apply(op, &rgba, params)?;
        Ok(out.into_iter().map(|[r, g, b, _]| [r, g, b]).collect())
    }

    /// Ambient visibility for each entry of `reference_depths`.
    ///
    /// `sample_depths` holds the same number of samples for every reference,
    /// laid out consecutively, so its length must be a multiple of
    /// `reference_depths.len()`. Zero samples per reference yields full
    /// visibility.
    pub fn occlusion(
        &self,
        sample_depths: &[f32],
        reference_depths: &[f32],
        radius: f32,
    ) -> Result<Vec<f32>, GpuError> {
        if reference_depths.is_empty() {
            return Ok(Vec::new());
        }
        if sample_depths.len() % reference_depths.len() != 0 {
            return Err(GpuError::LengthMismatch {
                what: "sample depths",
                expected: reference_depths.len(),
                actual: sample_depths.len(),
            });
        }
        let sample_count = sample_depths.len() / reference_depths.len();
        if sample_count == 0 {
            return Ok(vec![1.0; reference_depths.len()]);
        }
        let mut staging = self.staging.lock();

        let samples = GpuArrayHandle::upload(&self.device, "ember_sample_depths", sample_depths)?;
        let references =
            GpuArrayHandle::upload(&self.device, "ember_reference_depths", reference_depths)?;
        let output =
            GpuArrayHandle::create_output::<f32>(&self.device, "ember_visibility", references.len);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember_occlusion_encoder"),
            });
        self.occlusion_pass.dispatch(
            &self.device,
            &self.queue,
            &samples,
            &references,
            &output,
            sample_count as u32,
            radius,
            &mut encoder,
        )?;
        self.queue.submit(std::iter::once(encoder.finish()));

        readback::download(&self.device, &self.queue, &output, &mut staging)
    }

    /// Evaluate `op` for every shading sample. RGB quantities come back
    /// with `w = 1`; [`BrdfOp::EnvBrdf`] yields `[scale, bias, 0, 0]`.
    pub fn shade(
        &self,
        op: BrdfOp,
        samples: &[SurfaceSample],
    ) -> Result<Vec<[f32; 4]>, GpuError> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }
        let packed: Vec<SurfaceSampleGpu> =
            samples.iter().map(SurfaceSampleGpu::from_sample).collect();
        let mut staging = self.staging.lock();

        let source = GpuArrayHandle::upload(&self.device, "ember_surface_samples", &packed)?;
        let output =
            GpuArrayHandle::create_output::<[f32; 4]>(&self.device, "ember_brdf_output", source.len);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember_brdf_encoder"),
            });
        self.brdf_pass.dispatch(
            &self.device,
            &self.queue,
            op,
            &source,
            &output,
            &mut encoder,
        )?;
        self.queue.submit(std::iter::once(encoder.finish()));

        readback::download(&self.device, &self.queue, &output, &mut staging)
    }
}
