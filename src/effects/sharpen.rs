use crate::effects::blur::gaussian_blur_rgb8;
use crate::foundation::core::FrameRgb8;
use crate::foundation::error::FrameshiftResult;
use crate::foundation::math::add_weighted_u8;

/// Blur sigma used by the upscale sharpening pass.
pub const UNSHARP_SIGMA: f32 = 3.0;
/// Weight given to the blurred copy (`out = (1 + amount) * src - amount * blur`).
pub const UNSHARP_AMOUNT: f32 = 0.5;

/// Unsharp mask: `(1 + amount) * src - amount * gaussian_blur(src, sigma)`, clamped.
pub fn unsharp_mask_rgb8(src: &FrameRgb8, sigma: f32, amount: f32) -> FrameshiftResult<FrameRgb8> {
    let blurred = gaussian_blur_rgb8(src, sigma)?;
    let mut out = blurred;
    for (o, &s) in out.data.iter_mut().zip(src.data.iter()) {
        *o = add_weighted_u8(s, 1.0 + amount, *o, -amount);
    }
    Ok(out)
}

/// The sharpening pass shared by both upscale paths.
pub fn upscale_sharpen(src: &FrameRgb8) -> FrameshiftResult<FrameRgb8> {
    unsharp_mask_rgb8(src, UNSHARP_SIGMA, UNSHARP_AMOUNT)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/sharpen.rs"]
mod tests;
