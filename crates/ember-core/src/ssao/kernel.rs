//! Hemisphere sample kernel oriented around +Z.
//!
//! Each sample is a random direction in the upper hemisphere, scaled so that
//! early samples sit close to the origin:
//!
//! ```text
//! v     = normalize(rand(-1..1), rand(-1..1), rand(0..1))
//! scale = lerp(0.1, 1.0, (i / N)²)
//! out_i = v × scale
//! ```

use glam::Vec3;
use rand::Rng;

use super::{DEFAULT_KERNEL_SEED, normalize_guarded, seeded_rng};
use crate::error::CoreError;

/// Largest kernel the shader constant block can hold.
pub const MAX_SHADER_SAMPLES: usize = 64;

const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 1.0;

/// Fill `kernel` with hemisphere samples drawn from `rng`.
///
/// The sample count is `kernel.len()`. Draw order per sample is x, y, z, so
/// equal RNG state and length produce an identical table.
///
/// # Panics
/// Panics if `kernel` is empty.
pub fn generate_kernel<R: Rng + ?Sized>(rng: &mut R, kernel: &mut [Vec3]) {
    assert!(!kernel.is_empty(), "kernel sample count must be positive");

    let count = kernel.len() as f32;
    for (i, sample) in kernel.iter_mut().enumerate() {
        let x = rng.gen_range(-1.0_f32..=1.0);
        let y = rng.gen_range(-1.0_f32..=1.0);
        let z = rng.gen_range(0.0_f32..=1.0);
        let direction = normalize_guarded(Vec3::new(x, y, z));

        let t = i as f32 / count;
        let scale = MIN_SCALE + (MAX_SCALE - MIN_SCALE) * (t * t);
        *sample = direction * scale;
    }
}

/// An owned, immutable hemisphere kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    samples: Vec<Vec3>,
}

impl Kernel {
    /// Generate `count` samples from a generator seeded with `seed`.
    pub fn generate(count: usize, seed: u64) -> Result<Self, CoreError> {
        if count == 0 {
            return Err(CoreError::InvalidSampleCount(count));
        }
        let mut samples = vec![Vec3::ZERO; count];
        generate_kernel(&mut seeded_rng(seed), &mut samples);
        tracing::debug!(count, seed, "generated SSAO kernel");
        Ok(Self { samples })
    }

    /// Generate `count` samples with [`DEFAULT_KERNEL_SEED`].
    pub fn with_default_seed(count: usize) -> Result<Self, CoreError> {
        Self::generate(count, DEFAULT_KERNEL_SEED)
    }

    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pack the kernel as `vec4` shader constants (w = 0), truncated to
    /// [`MAX_SHADER_SAMPLES`] rows.
    pub fn shader_constants(&self) -> Vec<[f32; 4]> {
        self.samples
            .iter()
            .take(MAX_SHADER_SAMPLES)
            .map(|s| [s.x, s.y, s.z, 0.0])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_lies_in_upper_hemisphere() {
        for count in [4, 16, 32, 64] {
            let kernel = Kernel::with_default_seed(count).unwrap();
            assert_eq!(kernel.len(), count);
            for (i, s) in kernel.samples().iter().enumerate() {
                assert!((0.0..=1.0).contains(&s.z), "sample {i} z = {}", s.z);
                assert!(s.length() <= 1.0 + 1e-5, "sample {i} length {}", s.length());
            }
        }
    }

    #[test]
    fn test_kernel_is_reproducible() {
        let a = Kernel::generate(32, 42).unwrap();
        let b = Kernel::generate(32, 42).unwrap();
        let bits = |k: &Kernel| -> Vec<[u32; 3]> {
            k.samples()
                .iter()
                .map(|s| [s.x.to_bits(), s.y.to_bits(), s.z.to_bits()])
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));

        let c = Kernel::generate(32, 43).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_kernel_scale_grows_quadratically() {
        let kernel = Kernel::with_default_seed(64).unwrap();
        // Normalized directions scaled by lerp(0.1, 1.0, (i/N)^2).
        for (i, s) in kernel.samples().iter().enumerate() {
            let t = i as f32 / 64.0;
            let expected = 0.1 + 0.9 * t * t;
            let length = s.length();
            if length > 1e-3 {
                assert!(
                    (length - expected).abs() < 1e-4,
                    "sample {i}: length {length}, expected {expected}"
                );
            }
        }
        assert!(kernel.samples()[0].length() <= 0.1 + 1e-5);
    }

    #[test]
    fn test_generate_into_caller_buffer() {
        let mut a = [Vec3::ZERO; 8];
        let mut b = [Vec3::ZERO; 8];
        generate_kernel(&mut seeded_rng(7), &mut a);
        generate_kernel(&mut seeded_rng(7), &mut b);
        assert_eq!(a, b);
        assert!(a.iter().any(|s| *s != Vec3::ZERO));
    }

    #[test]
    #[should_panic(expected = "kernel sample count must be positive")]
    fn test_generate_kernel_rejects_empty_buffer() {
        generate_kernel(&mut seeded_rng(1), &mut []);
    }

    #[test]
    fn test_kernel_zero_count_is_an_error() {
        assert!(matches!(
            Kernel::generate(0, 1),
            Err(CoreError::InvalidSampleCount(0))
        ));
    }

    #[test]
    fn test_shader_constants_pad_and_truncate() {
        let kernel = Kernel::generate(80, 9).unwrap();
        let constants = kernel.shader_constants();
        assert_eq!(constants.len(), MAX_SHADER_SAMPLES);
        for (row, s) in constants.iter().zip(kernel.samples()) {
            assert_eq!(*row, [s.x, s.y, s.z, 0.0]);
        }
    }
}
