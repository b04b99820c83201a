//! GPU-to-CPU readback of pass outputs.

use std::sync::mpsc;

use crate::GpuError;
use crate::buffers::GpuArrayHandle;

/// Download a GPU array back to the CPU. Blocks until complete.
///
/// `staging_cache` holds a `MAP_READ` buffer that is reused while it is
/// large enough and replaced when it is not.
pub fn download<T: bytemuck::Pod>(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    handle: &GpuArrayHandle,
    staging_cache: &mut Option<wgpu::Buffer>,
) -> Result<Vec<T>, GpuError> {
    let size = handle.byte_size();
    if size == 0 {
        return Ok(Vec::new());
    }

    let needs_new_staging = match staging_cache.as_ref() {
        Some(buf) => buf.size() < size,
        None => true,
    };
    if needs_new_staging {
        tracing::debug!(size, "allocating readback staging buffer");
        *staging_cache = None;
    }
    let staging = staging_cache.get_or_insert_with(|| {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember_readback_staging"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        })
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("ember_readback_encoder"),
    });
    encoder.copy_buffer_to_buffer(&handle.buffer, 0, staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    let slice = staging.slice(..size);
    let (tx, rx) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::PollType::wait_indefinitely())?;
    rx.recv().map_err(|_| GpuError::MapCallbackDropped)??;

    let data = slice.get_mapped_range();
    let values = bytemuck::cast_slice::<u8, T>(&data).to_vec();
    drop(data);
    staging.unmap();

    Ok(values)
}
