//! Per-frame image processing.

/// Edge-preserving smoothing.
pub mod bilateral;
/// Separable Gaussian blur.
pub mod blur;
/// HSV conversions, saturation and tint.
pub mod color;
/// Kernel-based resizing.
pub mod resample;
/// Unsharp masking.
pub mod sharpen;
/// Mode-level frame pipelines.
pub mod transform;
