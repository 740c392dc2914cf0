use super::*;

fn spread(px: [u8; 3]) -> i32 {
    let max = *px.iter().max().unwrap() as i32;
    let min = *px.iter().min().unwrap() as i32;
    max - min
}

#[test]
fn primaries_round_trip_exactly() {
    for rgb in [
        [255u8, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 0],
        [0, 255, 255],
        [255, 0, 255],
    ] {
        assert_eq!(hsv8_to_rgb(rgb_to_hsv8(rgb)), rgb);
    }
    assert_eq!(rgb_to_hsv8([255, 0, 0]), [0, 255, 255]);
    assert_eq!(rgb_to_hsv8([0, 0, 255]), [120, 255, 255]);
}

#[test]
fn grays_have_zero_saturation() {
    for g in [0u8, 17, 128, 255] {
        let hsv = rgb_to_hsv8([g, g, g]);
        assert_eq!(hsv[1], 0);
        assert_eq!(hsv8_to_rgb(hsv), [g, g, g]);
    }
}

#[test]
fn round_trip_error_is_small() {
    for rgb in [[200u8, 120, 80], [13, 90, 40], [240, 230, 10], [70, 60, 200]] {
        let back = hsv8_to_rgb(rgb_to_hsv8(rgb));
        for c in 0..3 {
            assert!((i32::from(back[c]) - i32::from(rgb[c])).abs() <= 4, "{rgb:?} -> {back:?}");
        }
    }
}

#[test]
fn saturation_boost_widens_channel_spread() {
    let mut f = FrameRgb8::filled(2, 2, [180, 120, 100]);
    let before = spread(f.pixel(0, 0));
    boost_saturation(&mut f, 1.2);
    let after = f.pixel(0, 0);
    assert!(spread(after) > before, "{after:?}");
    // Value channel (max) is preserved.
    assert_eq!(after[0], 180);
}

#[test]
fn saturation_boost_leaves_grays_alone() {
    let mut f = FrameRgb8::filled(3, 1, [90, 90, 90]);
    boost_saturation(&mut f, 1.2);
    assert_eq!(f, FrameRgb8::filled(3, 1, [90, 90, 90]));
}

#[test]
fn tint_blend_is_linear_and_clamped() {
    let mut f = FrameRgb8::filled(1, 1, [100, 200, 0]);
    blend_constant_tint(&mut f, WARM_TINT_RGB, 0.1);
    assert_eq!(f.pixel(0, 0), [96, 184, 2]);

    let mut white = FrameRgb8::filled(1, 1, [255, 255, 255]);
    blend_constant_tint(&mut white, [255, 255, 255], 0.1);
    assert_eq!(white.pixel(0, 0), [255, 255, 255]);
}
