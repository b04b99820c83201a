//! Screen-space ambient occlusion — sample kernel, rotation noise, and the
//! depth-comparison occlusion estimate.
//!
//! The kernel and noise tables are generated once from a seeded RNG and then
//! shared read-only with the per-pixel execution. Generation mutates only the
//! RNG handed to it, so two generations from equal seeds are identical.

pub mod kernel;
pub mod noise;
pub mod occlusion;

use rand::SeedableRng;

pub use kernel::{Kernel, generate_kernel};
pub use noise::{NoiseTile, generate_noise};
pub use occlusion::occlusion_factor;

/// RNG used for table generation. ChaCha8 output is stable across crate
/// releases, so a seed pins the table bytes.
pub type SampleRng = rand_chacha::ChaCha8Rng;

/// Default seed for the hemisphere kernel.
pub const DEFAULT_KERNEL_SEED: u64 = 0x5EED_0A0C;
/// Default seed for the rotation noise tile. Distinct from the kernel seed.
pub const DEFAULT_NOISE_SEED: u64 = 0x5EED_4015;

/// Vectors shorter than this are left un-normalized.
pub(crate) const MIN_NORMALIZE_LENGTH: f32 = 0.001;

/// Build a fresh generator for `seed`.
pub fn seeded_rng(seed: u64) -> SampleRng {
    SampleRng::seed_from_u64(seed)
}

/// Normalize `v` unless it is shorter than [`MIN_NORMALIZE_LENGTH`].
#[inline]
pub(crate) fn normalize_guarded(v: glam::Vec3) -> glam::Vec3 {
    let length = v.length();
    if length > MIN_NORMALIZE_LENGTH { v / length } else { v }
}
