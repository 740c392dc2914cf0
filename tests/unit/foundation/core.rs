use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    assert_eq!(Fps::new(30, 1).unwrap().as_f64(), 30.0);
}

#[test]
fn fps_parses_ffmpeg_ratios() {
    assert_eq!(Fps::parse_ratio("30/1"), Some(Fps { num: 30, den: 1 }));
    assert_eq!(
        Fps::parse_ratio("30000/1001"),
        Some(Fps {
            num: 30000,
            den: 1001
        })
    );
    assert_eq!(Fps::parse_ratio("25"), Some(Fps { num: 25, den: 1 }));
    assert_eq!(Fps::parse_ratio("0/0"), None);
    assert_eq!(Fps::parse_ratio("abc"), None);
    assert_eq!(Fps::new(24000, 1001).unwrap().to_string(), "24000/1001");
}

#[test]
fn frame_new_validates_length() {
    assert!(FrameRgb8::new(2, 2, vec![0; 12]).is_ok());
    assert!(FrameRgb8::new(2, 2, vec![0; 11]).is_err());
    assert!(FrameRgb8::new(0, 2, vec![]).is_err());
}

#[test]
fn image_conversion_keeps_pixels() {
    let mut f = FrameRgb8::filled(3, 2, [1, 2, 3]);
    f.data[3..6].copy_from_slice(&[9, 8, 7]);
    let img = f.clone().into_image().unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [9, 8, 7]);
    let back = FrameRgb8::from_image(img);
    assert_eq!(back, f);
    assert_eq!(back.pixel(1, 0), [9, 8, 7]);
}
