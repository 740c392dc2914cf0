use super::*;
use crate::foundation::core::FrameIndex;
use crate::staging::area::StagedFormat;

#[test]
fn upscale_multiplies_geometry() {
    let out = FallbackUpscaler
        .upscale(FrameRgb8::filled(10, 6, [30, 60, 90]), 4)
        .unwrap();
    assert_eq!(out.dimensions(), (40, 24));
    // Flat input stays flat through resize and sharpening.
    assert_eq!(out.pixel(20, 12), [30, 60, 90]);
}

#[test]
fn upscale_is_deterministic() {
    let mut f = FrameRgb8::filled(8, 8, [10, 10, 10]);
    f.data[3 * 27..3 * 27 + 3].copy_from_slice(&[250, 250, 250]);
    let a = FallbackUpscaler.upscale(f.clone(), 2).unwrap();
    let b = FallbackUpscaler.upscale(f, 2).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_scale_is_rejected() {
    assert!(FallbackUpscaler
        .upscale(FrameRgb8::filled(2, 2, [0, 0, 0]), 0)
        .is_err());
}

#[test]
fn staged_run_writes_every_index() {
    let root = std::env::temp_dir().join(format!(
        "frameshift_fallback_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let mut area = StagingArea::at(&root, StagedFormat::Png);
    area.create_input_dir().unwrap();
    area.create_output_dir().unwrap();
    for i in 0..3 {
        area.stage_frame(FrameIndex(i), &FrameRgb8::filled(4, 4, [9, 9, 9]))
            .unwrap();
    }
    let mut seen = Vec::new();
    let outcome =
        FallbackUpscaler.upscale_staged(&area, ModelSelection::ANIMEVIDEO, &mut |n| seen.push(n));
    assert_eq!(outcome, UpscaleOutcome::Completed);
    assert_eq!(seen, vec![1, 2, 3]);
    area.verify_outputs().unwrap();
    assert_eq!(
        area.read_staged_output(FrameIndex(2)).unwrap().dimensions(),
        (8, 8)
    );
    area.cleanup().unwrap();
    assert!(!root.exists());
}
