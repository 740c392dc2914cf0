//! 8-bit HSV conversions and per-pixel grading operations.
//!
//! Hue is stored in `0..180` (two degrees per step) with saturation and value in `0..=255`, the
//! common 8-bit packing used by video tooling.

use crate::foundation::core::FrameRgb8;
use crate::foundation::math::{add_weighted_u8, saturate_u8};

/// Warm cast applied by the color grade, as RGB.
pub const WARM_TINT_RGB: [u8; 3] = [60, 40, 20];

/// Convert one RGB8 pixel to packed 8-bit HSV.
pub fn rgb_to_hsv8(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(f32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h8 = (h / 2.0).round() as u32 % 180;
    [h8 as u8, saturate_u8(s), v as u8]
}

/// Convert one packed 8-bit HSV pixel back to RGB8.
pub fn hsv8_to_rgb(hsv: [u8; 3]) -> [u8; 3] {
    let h = f32::from(hsv[0] % 180) * 2.0 / 60.0;
    let s = f32::from(hsv[1]) / 255.0;
    let v = f32::from(hsv[2]);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [saturate_u8(r), saturate_u8(g), saturate_u8(b)]
}

/// Multiply saturation by `factor` in HSV space, in place.
pub fn boost_saturation(frame: &mut FrameRgb8, factor: f32) {
    for px in frame.data.chunks_exact_mut(3) {
        let [h, s, v] = rgb_to_hsv8([px[0], px[1], px[2]]);
        let s = saturate_u8(f32::from(s) * factor);
        px.copy_from_slice(&hsv8_to_rgb([h, s, v]));
    }
}

/// Blend every pixel toward a constant color: `out = src*(1-weight) + tint*weight`.
pub fn blend_constant_tint(frame: &mut FrameRgb8, tint: [u8; 3], weight: f32) {
    let keep = 1.0 - weight;
    for px in frame.data.chunks_exact_mut(3) {
        for c in 0..3 {
            px[c] = add_weighted_u8(px[c], keep, tint[c], weight);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
