//! Depth-comparison occlusion estimate.
//!
//! ```text
//! delta_i   = reference_depth − sample_depth_i
//! occluding = count(0 < delta_i ≤ radius)
//! factor    = saturate(1 − occluding / N)
//! ```
//!
//! A sample only occludes when it is strictly closer than the reference and
//! within `radius`. Samples at equal or greater depth, or further than
//! `radius` in front, never darken the result.

use crate::saturate;

/// Whether a single depth sample occludes the reference point.
#[inline]
pub fn is_occluding(sample_depth: f32, reference_depth: f32, radius: f32) -> bool {
    let delta = reference_depth - sample_depth;
    delta > 0.0 && delta <= radius
}

/// Ambient visibility at a point: 1 = fully visible, 0 = fully occluded.
///
/// An empty sample set is treated as fully visible.
pub fn occlusion_factor(sample_depths: &[f32], reference_depth: f32, radius: f32) -> f32 {
    if sample_depths.is_empty() {
        return 1.0;
    }
    let occluding = sample_depths
        .iter()
        .filter(|&&depth| is_occluding(depth, reference_depth, radius))
        .count();
    saturate(1.0 - occluding as f32 / sample_depths.len() as f32)
}
