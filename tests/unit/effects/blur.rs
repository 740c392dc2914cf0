use super::*;

#[test]
fn radius_follows_three_sigma_rule() {
    assert_eq!(radius_for_sigma(3.0), 9);
    assert_eq!(radius_for_sigma(1.0), 3);
}

#[test]
fn blur_radius_0_is_identity() {
    let src = FrameRgb8::new(1, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let out = gaussian_blur_rgb8_radius(&src, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let src = FrameRgb8::filled(4, 3, [10, 20, 30]);
    let out = gaussian_blur_rgb8(&src, 3.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = FrameRgb8::filled(w, h, [0, 0, 0]);
    let center = ((4 * w + 4) * 3) as usize;
    src.data[center..center + 3].copy_from_slice(&[255, 255, 255]);

    let out = gaussian_blur_rgb8_radius(&src, 2, 1.2).unwrap();

    let nonzero = out.data.chunks_exact(3).filter(|px| px[0] != 0).count();
    assert!(nonzero > 1);

    let sum: u32 = out.data.chunks_exact(3).map(|px| u32::from(px[0])).sum();
    assert!((sum as i32 - 255).abs() <= 6);
}

#[test]
fn blur_rejects_non_positive_sigma() {
    let src = FrameRgb8::filled(2, 2, [1, 1, 1]);
    assert!(gaussian_blur_rgb8_radius(&src, 1, 0.0).is_err());
}
