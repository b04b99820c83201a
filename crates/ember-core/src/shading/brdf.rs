//! Cook-Torrance specular BRDF with a Lambert diffuse lobe.
//!
//! ```text
//! D = a² / (π · ((n·h)² (a² − 1) + 1)²)          a = roughness²
//! G = G1(n·v) · G1(n·l),  G1(x) = x / (x (1 − k) + k),  k = (roughness + 1)² / 8
//! F = F0 + (1 − F0)(1 − cosθ)⁵
//! specular = D F G / (4 (n·v)(n·l))
//! ```
//!
//! Every denominator is floored at [`DENOM_FLOOR`], so each function is
//! total over its inputs.
//!
//! # Reference
//! - Karis (2013), "Real Shading in Unreal Engine 4"
//! - Lazarov (2013), "Getting More Physical in Call of Duty: Black Ops II"

use std::f32::consts::PI;

use glam::{Vec2, Vec3, Vec4};

use crate::saturate;

/// Base reflectivity of dielectrics at normal incidence.
pub const DIELECTRIC_F0: f32 = 0.04;

/// Floor applied to every BRDF denominator.
pub const DENOM_FLOOR: f32 = 0.0001;

const ENV_C0: Vec4 = Vec4::new(-1.0, -0.0275, -0.572, 0.022);
const ENV_C1: Vec4 = Vec4::new(1.0, 0.0425, 1.04, -0.04);

#[inline]
fn schlick_weight(cos_theta: f32) -> f32 {
    (1.0 - saturate(cos_theta)).powf(5.0)
}

/// Schlick's Fresnel approximation.
pub fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    f0 + (Vec3::ONE - f0) * schlick_weight(cos_theta)
}

/// Schlick Fresnel with the grazing peak limited to `1 − roughness`, for
/// ambient lighting where no half vector exists.
pub fn fresnel_schlick_roughness(cos_theta: f32, f0: Vec3, roughness: f32) -> Vec3 {
    let grazing = Vec3::splat(1.0 - roughness).max(f0);
    f0 + (grazing - f0) * schlick_weight(cos_theta)
}

/// GGX / Trowbridge-Reitz normal distribution.
pub fn distribution_ggx(n: Vec3, h: Vec3, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let n_dot_h = saturate(n.dot(h));
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (PI * d * d).max(DENOM_FLOOR)
}

/// Schlick-GGX masking term for one direction, with the direct-lighting `k`.
pub fn geometry_schlick_ggx(n_dot_v: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = r * r / 8.0;
    n_dot_v / (n_dot_v * (1.0 - k) + k).max(DENOM_FLOOR)
}

/// Smith shadowing-masking: masking toward `v` times shadowing toward `l`.
pub fn geometry_smith(n: Vec3, v: Vec3, l: Vec3, roughness: f32) -> f32 {
    let n_dot_v = saturate(n.dot(v));
    let n_dot_l = saturate(n.dot(l));
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

/// Cook-Torrance specular reflectance.
pub fn cook_torrance_specular(n: Vec3, v: Vec3, l: Vec3, h: Vec3, f0: Vec3, roughness: f32) -> Vec3 {
    let d = distribution_ggx(n, h, roughness);
    let f = fresnel_schlick(saturate(h.dot(v)), f0);
    let g = geometry_smith(n, v, l, roughness);

    let n_dot_v = saturate(n.dot(v));
    let n_dot_l = saturate(n.dot(l));
    f * (d * g) / (4.0 * n_dot_v * n_dot_l).max(DENOM_FLOOR)
}

/// Lazarov's analytic fit of the pre-integrated environment BRDF.
///
/// Returns `(scale, bias)`; the ambient specular is `F0 × scale + bias`.
pub fn env_brdf_approx(roughness: f32, n_dot_v: f32) -> Vec2 {
    let r = roughness * ENV_C0 + ENV_C1;
    let a004 = (r.x * r.x).min((-9.28 * n_dot_v).exp2()) * r.x + r.y;
    Vec2::new(-1.04, 1.04) * a004 + Vec2::new(r.z, r.w)
}

/// Base reflectivity: 0.04 for dielectrics, blending to `albedo` for metals.
pub fn calculate_f0(albedo: Vec3, metalness: f32) -> Vec3 {
    Vec3::splat(DIELECTRIC_F0).lerp(albedo, metalness)
}

/// Lambert diffuse weighted by the energy Fresnel leaves behind. Metals have
/// none.
pub fn calculate_diffuse(albedo: Vec3, metalness: f32, fresnel: Vec3) -> Vec3 {
    let kd = (Vec3::ONE - fresnel) * (1.0 - metalness);
    kd * albedo / PI
}

/// One shading point: geometry, a single light direction, and material.
///
/// Direction vectors need not be normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub normal: Vec3,
    /// Toward the camera.
    pub view: Vec3,
    /// Toward the light.
    pub light: Vec3,
    pub albedo: Vec3,
    pub metalness: f32,
    pub roughness: f32,
}

impl SurfaceSample {
    fn frame(&self) -> (Vec3, Vec3, Vec3, Vec3) {
        let n = self.normal.normalize_or_zero();
        let v = self.view.normalize_or_zero();
        let l = self.light.normalize_or_zero();
        let h = (v + l).normalize_or_zero();
        (n, v, l, h)
    }

    pub fn f0(&self) -> Vec3 {
        calculate_f0(self.albedo, self.metalness)
    }

    /// Fresnel at the half vector.
    pub fn fresnel(&self) -> Vec3 {
        let (_, v, _, h) = self.frame();
        fresnel_schlick(saturate(h.dot(v)), self.f0())
    }

    pub fn specular(&self) -> Vec3 {
        let (n, v, l, h) = self.frame();
        cook_torrance_specular(n, v, l, h, self.f0(), self.roughness)
    }

    /// Outgoing radiance for a unit-intensity light:
    /// `(diffuse + specular) × saturate(n·l)`.
    pub fn direct_lighting(&self) -> Vec3 {
        let (n, _, l, _) = self.frame();
        let diffuse = calculate_diffuse(self.albedo, self.metalness, self.fresnel());
        (diffuse + self.specular()) * saturate(n.dot(l))
    }

    /// Environment BRDF `(scale, bias)` at this point's view angle.
    pub fn env_brdf(&self) -> Vec2 {
        let (n, v, _, _) = self.frame();
        env_brdf_approx(self.roughness, saturate(n.dot(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_vec3_close(actual: Vec3, expected: Vec3, tolerance: f32) {
        assert!(
            (actual - expected).abs().max_element() < tolerance,
            "{actual:?} vs {expected:?}"
        );
    }

    #[test]
    fn test_fresnel_endpoints() {
        let f0 = Vec3::splat(DIELECTRIC_F0);
        assert_vec3_close(fresnel_schlick(1.0, f0), f0, 1e-6);
        assert_vec3_close(fresnel_schlick(0.0, f0), Vec3::ONE, 1e-6);
        assert_vec3_close(fresnel_schlick(0.5, f0), Vec3::splat(0.07), 1e-6);
        // cosθ is saturated first.
        assert_eq!(fresnel_schlick(-0.5, f0), fresnel_schlick(0.0, f0));
    }

    #[test]
    fn test_fresnel_roughness_limits_grazing_peak() {
        let f0 = Vec3::splat(DIELECTRIC_F0);
        assert_vec3_close(fresnel_schlick_roughness(0.0, f0, 0.5), Vec3::splat(0.5), 1e-6);
        assert_vec3_close(fresnel_schlick_roughness(0.5, f0, 0.8), Vec3::splat(0.045), 1e-6);
        // Rough metals never drop below F0.
        let gold = Vec3::new(1.0, 0.78, 0.34);
        assert_vec3_close(fresnel_schlick_roughness(0.0, gold, 1.0), gold, 1e-6);
    }

    #[test]
    fn test_ggx_peak_values() {
        let n = Vec3::Z;
        assert!((distribution_ggx(n, n, 1.0) - 1.0 / PI).abs() < 1e-6);
        assert!((distribution_ggx(n, n, 0.5) - 5.092_958).abs() < EPSILON);
        let h = Vec3::new(0.6, 0.0, 0.8);
        assert!((distribution_ggx(n, h, 0.5) - 0.124_339_8).abs() < EPSILON);
    }

    #[test]
    fn test_ggx_mirror_is_floored_not_nan() {
        // roughness 0 at the peak: 0 / max(0, floor) = 0.
        let d = distribution_ggx(Vec3::Z, Vec3::Z, 0.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_geometry_terms() {
        assert!((geometry_schlick_ggx(0.5, 0.5) - 0.780_487_8).abs() < 1e-6);
        assert!((geometry_schlick_ggx(1.0, 0.3) - 1.0).abs() < 1e-6);
        assert_eq!(geometry_schlick_ggx(0.0, 0.3), 0.0);
        let g = geometry_smith(Vec3::Z, Vec3::Z, Vec3::new(0.0, 0.6, 0.8), 0.5);
        assert!((g - geometry_schlick_ggx(0.8, 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_env_brdf_golden_values() {
        let ab = env_brdf_approx(0.0, 1.0);
        assert!((ab.x - 0.994_127).abs() < EPSILON && (ab.y - 0.005_873).abs() < EPSILON);
        let ab = env_brdf_approx(1.0, 0.5);
        assert!((ab.x - 0.4524).abs() < EPSILON && (ab.y + 0.0024).abs() < EPSILON);
        let ab = env_brdf_approx(0.5, 0.5);
        assert!((ab.x - 0.703_244).abs() < EPSILON && (ab.y - 0.021_756).abs() < EPSILON);
    }

    #[test]
    fn test_f0_and_diffuse_follow_metalness() {
        let albedo = Vec3::new(0.9, 0.6, 0.2);
        assert_vec3_close(calculate_f0(albedo, 0.0), Vec3::splat(0.04), 1e-6);
        assert_vec3_close(calculate_f0(albedo, 1.0), albedo, 1e-6);
        assert_eq!(calculate_diffuse(albedo, 1.0, Vec3::splat(0.1)), Vec3::ZERO);
        assert_vec3_close(
            calculate_diffuse(albedo, 0.0, Vec3::ZERO),
            albedo / PI,
            1e-6,
        );
    }

    #[test]
    fn test_direct_lighting_head_on_dielectric() {
        let sample = SurfaceSample {
            normal: Vec3::Z,
            view: Vec3::Z,
            light: Vec3::Z,
            albedo: Vec3::new(0.8, 0.2, 0.1),
            metalness: 0.0,
            roughness: 0.5,
        };
        assert_vec3_close(sample.fresnel(), Vec3::splat(0.04), 1e-6);
        assert_vec3_close(sample.specular(), Vec3::splat(0.050_929_58), EPSILON);
        assert_vec3_close(
            sample.direct_lighting(),
            Vec3::new(0.295_391_6, 0.112_045_1, 0.081_487_3),
            EPSILON,
        );
    }

    #[test]
    fn test_direct_lighting_normalizes_inputs() {
        let unit = SurfaceSample {
            normal: Vec3::Z,
            view: Vec3::new(0.0, 0.6, 0.8),
            light: Vec3::new(0.0, -0.6, 0.8),
            albedo: Vec3::new(0.9, 0.6, 0.2),
            metalness: 1.0,
            roughness: 0.3,
        };
        let scaled = SurfaceSample {
            normal: Vec3::Z * 3.0,
            view: unit.view * 0.25,
            light: unit.light * 7.0,
            ..unit
        };
        let expected = Vec3::new(9.971_742, 6.649_01, 2.218_7);
        assert_vec3_close(unit.direct_lighting(), expected, 1e-3);
        assert_vec3_close(scaled.direct_lighting(), expected, 1e-3);
    }

    #[test]
    fn test_light_behind_surface_contributes_nothing() {
        let sample = SurfaceSample {
            normal: Vec3::Z,
            view: Vec3::Z,
            light: -Vec3::Z,
            albedo: Vec3::splat(0.5),
            metalness: 0.0,
            roughness: 0.5,
        };
        let radiance = sample.direct_lighting();
        assert!(radiance.is_finite());
        assert_eq!(radiance, Vec3::ZERO);
    }

    #[test]
    fn test_env_brdf_uses_view_angle() {
        let sample = SurfaceSample {
            normal: Vec3::Z,
            view: Vec3::new(0.0, 0.866_025_4, 0.5),
            light: Vec3::Z,
            albedo: Vec3::ONE,
            metalness: 0.0,
            roughness: 0.5,
        };
        let expected = env_brdf_approx(0.5, 0.5);
        assert!((sample.env_brdf() - expected).abs().max_element() < EPSILON);
    }
}
