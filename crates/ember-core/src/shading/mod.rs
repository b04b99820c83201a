//! Physically based shading — the Cook-Torrance microfacet BRDF.

pub mod brdf;

pub use brdf::SurfaceSample;
