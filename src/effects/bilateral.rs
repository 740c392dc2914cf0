use crate::foundation::core::FrameRgb8;
use crate::foundation::error::{FrameshiftError, FrameshiftResult};
use crate::foundation::math::{reflect101, saturate_u8};

/// Edge-preserving smoothing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BilateralParams {
    /// Neighbourhood diameter in pixels.
    pub diameter: u32,
    /// Range (color distance) sigma.
    pub sigma_color: f32,
    /// Spatial sigma.
    pub sigma_space: f32,
}

impl BilateralParams {
    /// Settings tuned for skin-like regions.
    pub const SKIN: Self = Self {
        diameter: 9,
        sigma_color: 75.0,
        sigma_space: 75.0,
    };
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self::SKIN
    }
}

/// Bilateral filter over an RGB8 frame.
///
/// Color distance is the L1 distance summed over the three channels; the spatial support is the
/// disc of radius `diameter / 2`. Borders mirror without repeating the edge pixel.
pub fn bilateral_filter_rgb8(
    src: &FrameRgb8,
    params: BilateralParams,
) -> FrameshiftResult<FrameRgb8> {
    if !params.sigma_color.is_finite() || params.sigma_color <= 0.0 {
        return Err(FrameshiftError::validation("bilateral sigma_color must be > 0"));
    }
    if !params.sigma_space.is_finite() || params.sigma_space <= 0.0 {
        return Err(FrameshiftError::validation("bilateral sigma_space must be > 0"));
    }

    let radius = (params.diameter / 2).max(1) as i32;
    let taps = spatial_taps(radius, params.sigma_space);
    let color_lut = color_weights(params.sigma_color);

    let w = src.width as i32;
    let h = src.height as i32;
    let mut out = vec![0u8; src.data.len()];

    for y in 0..h {
        for x in 0..w {
            let center = ((y * w + x) as usize) * 3;
            let c0 = &src.data[center..center + 3];
            let mut acc = [0f32; 3];
            let mut wsum = 0f32;

            for &(dx, dy, ws) in &taps {
                let sx = reflect101(x + dx, w);
                let sy = reflect101(y + dy, h);
                let idx = ((sy * w + sx) as usize) * 3;
                let px = &src.data[idx..idx + 3];
                let dist = px[0].abs_diff(c0[0]) as usize
                    + px[1].abs_diff(c0[1]) as usize
                    + px[2].abs_diff(c0[2]) as usize;
                let wt = ws * color_lut[dist];
                for c in 0..3 {
                    acc[c] += wt * f32::from(px[c]);
                }
                wsum += wt;
            }

            for c in 0..3 {
                out[center + c] = saturate_u8(acc[c] / wsum);
            }
        }
    }

    FrameRgb8::new(src.width, src.height, out)
}

fn spatial_taps(radius: i32, sigma_space: f32) -> Vec<(i32, i32, f32)> {
    let coeff = -0.5 / (sigma_space * sigma_space);
    let mut taps = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2.sqrt() > radius as f32 {
                continue;
            }
            taps.push((dx, dy, (r2 * coeff).exp()));
        }
    }
    taps
}

fn color_weights(sigma_color: f32) -> Vec<f32> {
    let coeff = -0.5 / (sigma_color * sigma_color);
    (0..=255 * 3)
        .map(|d| {
            let d = d as f32;
            (d * d * coeff).exp()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/bilateral.rs"]
mod tests;
