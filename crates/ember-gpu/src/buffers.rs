//! GPU storage buffer management for per-pixel passes.

use wgpu::util::DeviceExt;

use crate::GpuError;

/// Handle to a storage buffer holding `len` elements of `stride` bytes.
pub struct GpuArrayHandle {
    pub buffer: wgpu::Buffer,
    pub len: u32,
    pub stride: u64,
}

impl GpuArrayHandle {
    /// Upload a slice of plain-old-data elements as a read-only input.
    ///
    /// Fails with [`GpuError::TooLarge`] when the slice does not fit in one
    /// storage binding on `device`.
    pub fn upload<T: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &'static str,
        data: &[T],
    ) -> Result<Self, GpuError> {
        let stride = std::mem::size_of::<T>() as u64;
        let len = checked_len(label, data.len(), stride, &device.limits())?;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        });
        Ok(Self {
            buffer,
            len,
            stride,
        })
    }

    /// Create an uninitialized output buffer for `len` elements of `T`.
    pub fn create_output<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, len: u32) -> Self {
        let stride = std::mem::size_of::<T>() as u64;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * len as u64,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            len,
            stride,
        }
    }

    /// Buffer size in bytes.
    pub fn byte_size(&self) -> u64 {
        self.stride * self.len as u64
    }
}

/// Largest element count of `stride` bytes one storage binding can hold.
pub fn max_binding_elements(stride: u64, limits: &wgpu::Limits) -> u64 {
    let max_bytes = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
    (max_bytes / stride.max(1)).min(u64::from(u32::MAX))
}

/// `len` as a `u32` element count, if it fits in a storage binding.
pub fn checked_len(
    what: &'static str,
    len: usize,
    stride: u64,
    limits: &wgpu::Limits,
) -> Result<u32, GpuError> {
    let max = max_binding_elements(stride, limits);
    if len as u64 > max {
        return Err(GpuError::TooLarge { what, len, max });
    }
    Ok(len as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_len_accepts_up_to_the_binding_limit() {
        let limits = wgpu::Limits::default();
        let max = max_binding_elements(16, &limits);
        assert_eq!(max, u64::from(limits.max_storage_buffer_binding_size) / 16);
        assert_eq!(checked_len("pixels", max as usize, 16, &limits).unwrap(), max as u32);
        assert_eq!(checked_len("pixels", 0, 16, &limits).unwrap(), 0);
    }

    #[test]
    fn test_checked_len_rejects_oversized_input() {
        let limits = wgpu::Limits::default();
        let max = max_binding_elements(16, &limits);
        let err = checked_len("pixels", max as usize + 1, 16, &limits).unwrap_err();
        assert!(matches!(err, GpuError::TooLarge { what: "pixels", max: m, .. } if m == max));
    }

    #[test]
    fn test_checked_len_never_truncates_to_u32() {
        let limits = wgpu::Limits {
            max_storage_buffer_binding_size: u32::MAX,
            max_buffer_size: u64::MAX,
            ..wgpu::Limits::default()
        };
        assert_eq!(max_binding_elements(1, &limits), u64::from(u32::MAX));
        let huge = u32::MAX as u64 + 1;
        if let Ok(huge) = usize::try_from(huge) {
            assert!(checked_len("depths", huge, 1, &limits).is_err());
        }
    }
}
