//! 4×4 tile of random tangent-plane rotation vectors.
//!
//! Tiled across the screen to rotate the kernel per pixel; the blur pass
//! downstream removes the resulting 4×4 pattern.

use glam::Vec3;
use rand::Rng;

use super::{DEFAULT_NOISE_SEED, normalize_guarded, seeded_rng};

/// Tile edge length in texels.
pub const NOISE_TILE_SIZE: usize = 4;
/// Texels per tile.
pub const NOISE_TEXELS: usize = NOISE_TILE_SIZE * NOISE_TILE_SIZE;

/// Fill `noise` with unit XY rotation vectors (z = 0) drawn from `rng`.
pub fn generate_noise<R: Rng + ?Sized>(rng: &mut R, noise: &mut [Vec3; NOISE_TEXELS]) {
    for texel in noise.iter_mut() {
        let x = rng.gen_range(-1.0_f32..=1.0);
        let y = rng.gen_range(-1.0_f32..=1.0);
        *texel = normalize_guarded(Vec3::new(x, y, 0.0));
    }
}

/// An immutable 4×4 rotation noise tile, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseTile {
    texels: [Vec3; NOISE_TEXELS],
}

impl NoiseTile {
    pub fn generate(seed: u64) -> Self {
        let mut texels = [Vec3::ZERO; NOISE_TEXELS];
        generate_noise(&mut seeded_rng(seed), &mut texels);
        tracing::debug!(seed, "generated SSAO noise tile");
        Self { texels }
    }

    pub fn with_default_seed() -> Self {
        Self::generate(DEFAULT_NOISE_SEED)
    }

    pub fn texels(&self) -> &[Vec3; NOISE_TEXELS] {
        &self.texels
    }

    /// Rotation vector for a screen pixel; the tile repeats every 4 pixels.
    pub fn texel(&self, px: u32, py: u32) -> Vec3 {
        let x = px as usize % NOISE_TILE_SIZE;
        let y = py as usize % NOISE_TILE_SIZE;
        self.texels[y * NOISE_TILE_SIZE + x]
    }

    /// Encode as RGBA8 texels: `(v × 0.5 + 0.5) × 255`, alpha 255.
    pub fn to_rgba8(&self) -> [[u8; 4]; NOISE_TEXELS] {
        let encode = |v: f32| ((v * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8;
        self.texels
            .map(|t| [encode(t.x), encode(t.y), encode(t.z), u8::MAX])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_is_unit_length_in_xy_plane() {
        let tile = NoiseTile::with_default_seed();
        for (i, t) in tile.texels().iter().enumerate() {
            assert_eq!(t.z, 0.0, "texel {i}");
            assert!((t.length() - 1.0).abs() < 1e-5, "texel {i} length {}", t.length());
        }
    }

    #[test]
    fn test_noise_is_reproducible_and_seed_dependent() {
        assert_eq!(NoiseTile::generate(11), NoiseTile::generate(11));
        assert_ne!(NoiseTile::generate(11), NoiseTile::generate(12));
    }

    #[test]
    fn test_noise_seed_differs_from_kernel_seed() {
        assert_ne!(DEFAULT_NOISE_SEED, crate::ssao::DEFAULT_KERNEL_SEED);
    }

    #[test]
    fn test_texel_wraps_every_four_pixels() {
        let tile = NoiseTile::with_default_seed();
        assert_eq!(tile.texel(0, 0), tile.texels()[0]);
        assert_eq!(tile.texel(3, 1), tile.texels()[7]);
        assert_eq!(tile.texel(5, 6), tile.texel(1, 2));
        assert_eq!(tile.texel(1023, 4), tile.texel(3, 0));
    }

    #[test]
    fn test_rgba8_encoding() {
        let tile = NoiseTile::with_default_seed();
        for (texel, rgba) in tile.texels().iter().zip(tile.to_rgba8()) {
            // z = 0 lands on mid-gray.
            assert_eq!(rgba[2], 128);
            assert_eq!(rgba[3], 255);
            let decoded = rgba[0] as f32 / 255.0 * 2.0 - 1.0;
            assert!((decoded - texel.x).abs() < 0.01);
        }
    }
}
