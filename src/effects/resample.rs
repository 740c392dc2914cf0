use image::imageops::{self, FilterType};

use crate::foundation::core::FrameRgb8;
use crate::foundation::error::{FrameshiftError, FrameshiftResult};

/// Resampling kernel used when resizing frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleKernel {
    /// Windowed sinc, used for the fixed-target upscale.
    Lanczos3,
    /// Cubic convolution, used by the fallback upscaler.
    Bicubic,
}

impl ResampleKernel {
    fn filter(self) -> FilterType {
        match self {
            Self::Lanczos3 => FilterType::Lanczos3,
            Self::Bicubic => FilterType::CatmullRom,
        }
    }
}

/// Resize to exactly `width x height`. Runs even when the size is unchanged or smaller.
pub fn resize_rgb8(
    src: FrameRgb8,
    width: u32,
    height: u32,
    kernel: ResampleKernel,
) -> FrameshiftResult<FrameRgb8> {
    if width == 0 || height == 0 {
        return Err(FrameshiftError::validation(
            "resize target width/height must be non-zero",
        ));
    }
    let img = src.into_image()?;
    let resized = imageops::resize(&img, width, height, kernel.filter());
    Ok(FrameRgb8::from_image(resized))
}

/// Resize by an integer factor on both axes.
pub fn scale_rgb8(src: FrameRgb8, factor: u32, kernel: ResampleKernel) -> FrameshiftResult<FrameRgb8> {
    let width = src
        .width
        .checked_mul(factor)
        .ok_or_else(|| FrameshiftError::validation("scaled width overflows"))?;
    let height = src
        .height
        .checked_mul(factor)
        .ok_or_else(|| FrameshiftError::validation("scaled height overflows"))?;
    resize_rgb8(src, width, height, kernel)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resample.rs"]
mod tests;
