use crate::foundation::core::{FrameRgb8, rgb8_len};
use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::foundation::math::reflect101;

/// Kernel radius used for a given sigma (`3 * sigma` on each side, odd support).
pub fn radius_for_sigma(sigma: f32) -> u32 {
    let ksize = ((sigma * 3.0 * 2.0 + 1.0).round() as u32) | 1;
    ksize / 2
}

/// Separable Gaussian blur over an RGB8 frame, radius derived from `sigma`.
pub fn gaussian_blur_rgb8(src: &FrameRgb8, sigma: f32) -> FrameshiftResult<FrameRgb8> {
    gaussian_blur_rgb8_radius(src, radius_for_sigma(sigma), sigma)
}

/// Separable Gaussian blur with an explicit radius. Radius `0` is identity.
pub fn gaussian_blur_rgb8_radius(
    src: &FrameRgb8,
    radius: u32,
    sigma: f32,
) -> FrameshiftResult<FrameRgb8> {
    let expected_len = rgb8_len(src.width, src.height)?;
    if src.data.len() != expected_len {
        return Err(FrameshiftError::validation(
            "gaussian_blur_rgb8 expects data matching width*height*3",
        ));
    }
    if radius == 0 {
        return Ok(src.clone());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(&src.data, &mut tmp, src.width, src.height, &kernel);
    vertical_pass(&tmp, &mut out, src.width, src.height, &kernel);
    FrameRgb8::new(src.width, src.height, out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> FrameshiftResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(FrameshiftError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Put the rounding residue on the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = reflect101(x + ki as i32 - radius, w);
                let idx = (row + sx as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (row + x as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 3];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = reflect101(y + ki as i32 - radius, h);
                let idx = ((sy * w + x) as usize) * 3;
                for c in 0..3 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 3;
            for c in 0..3 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
