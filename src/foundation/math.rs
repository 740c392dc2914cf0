/// Round and saturate a float sample into `0..=255`.
pub(crate) fn saturate_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Map a possibly out-of-range coordinate into `0..len` by mirroring around the edge pixel
/// (`dcb|abcd|cba`).
pub(crate) fn reflect101(i: i32, len: i32) -> i32 {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut m = i.rem_euclid(period);
    if m >= len {
        m = period - m;
    }
    m
}

/// Weighted per-channel blend `a*wa + b*wb`, saturated.
pub(crate) fn add_weighted_u8(a: u8, wa: f32, b: u8, wb: f32) -> u8 {
    saturate_u8(f32::from(a) * wa + f32::from(b) * wb)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
