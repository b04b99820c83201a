//! Grading tools — exposure, saturation, contrast, and brightness.

pub mod sliders;

pub use sliders::{adjust_brightness, adjust_contrast, adjust_exposure, adjust_saturation};
