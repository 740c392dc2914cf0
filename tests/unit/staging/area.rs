use super::*;

fn scratch_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "frameshift_staging_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn file_names_are_zero_padded() {
    let area = StagingArea::at(scratch_root("names"), StagedFormat::Png);
    assert_eq!(area.file_name(FrameIndex(0)), "00000000.png");
    assert_eq!(area.file_name(FrameIndex(42)), "00000042.png");
    let jpg = StagingArea::at(scratch_root("names_jpg"), StagedFormat::Jpg);
    assert_eq!(jpg.file_name(FrameIndex(7)), "00000007.jpg");
}

#[test]
fn root_is_derived_from_video_directory() {
    let area = StagingArea::for_video(Path::new("/data/in/clip.mp4"), StagedFormat::Png);
    assert_eq!(area.root().parent(), Some(Path::new("/data/in")));
    let name = area.root().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with(".frameshift_clip_"), "{name}");

    let bare = StagingArea::for_video(Path::new("clip.mp4"), StagedFormat::Png);
    assert_eq!(bare.root().parent(), Some(Path::new(".")));
}

#[test]
fn staging_round_trip_and_output_invariant() {
    let mut area = StagingArea::at(scratch_root("roundtrip"), StagedFormat::Png);
    area.create_input_dir().unwrap();
    area.create_output_dir().unwrap();

    for i in 0..3u64 {
        let f = FrameRgb8::filled(4, 2, [i as u8 * 10, 1, 2]);
        area.stage_frame(FrameIndex(i), &f).unwrap();
    }
    assert_eq!(area.staged_count(), 3);
    assert_eq!(area.read_staged_input(FrameIndex(2)).unwrap().pixel(0, 0), [20, 1, 2]);

    assert!(matches!(
        area.verify_outputs(),
        Err(FrameshiftError::MissingFrame { index: 0 })
    ));

    area.write_output(FrameIndex(0), &FrameRgb8::filled(8, 4, [5, 5, 5]))
        .unwrap();
    area.write_output(FrameIndex(2), &FrameRgb8::filled(8, 4, [5, 5, 5]))
        .unwrap();
    assert_eq!(area.first_missing_output(), Some(FrameIndex(1)));
    assert!(matches!(
        area.read_staged_output(FrameIndex(1)),
        Err(FrameshiftError::MissingFrame { index: 1 })
    ));

    area.write_output(FrameIndex(1), &FrameRgb8::filled(8, 4, [5, 5, 5]))
        .unwrap();
    area.verify_outputs().unwrap();
    assert_eq!(
        area.read_staged_output(FrameIndex(1)).unwrap().dimensions(),
        (8, 4)
    );

    let root = area.root().to_path_buf();
    area.cleanup().unwrap();
    assert!(!root.exists());
    area.cleanup().unwrap();
}

#[test]
fn non_contiguous_staging_is_rejected() {
    let mut area = StagingArea::at(scratch_root("gap"), StagedFormat::Png);
    area.create_input_dir().unwrap();
    let f = FrameRgb8::filled(2, 2, [0, 0, 0]);
    assert!(area.stage_frame(FrameIndex(1), &f).is_err());
    area.stage_frame(FrameIndex(0), &f).unwrap();
    assert!(area.write_output(FrameIndex(5), &f).is_err());
}

#[test]
fn drop_removes_directories() {
    let root = scratch_root("drop");
    {
        let mut area = StagingArea::at(&root, StagedFormat::Png);
        area.create_input_dir().unwrap();
        area.create_output_dir().unwrap();
        assert!(root.join("in").is_dir());
    }
    assert!(!root.exists());
}

#[test]
fn mixed_frame_sizes_are_rejected() {
    let mut area = StagingArea::at(scratch_root("mixed"), StagedFormat::Png);
    area.create_input_dir().unwrap();
    area.stage_frame(FrameIndex(0), &FrameRgb8::filled(4, 2, [1, 1, 1]))
        .unwrap();
    assert_eq!(area.frame_size(), Some((4, 2)));
    let err = area
        .stage_frame(FrameIndex(1), &FrameRgb8::filled(2, 4, [1, 1, 1]))
        .unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert_eq!(area.staged_count(), 1);
    area.cleanup().unwrap();
}

#[test]
fn check_output_decodes_and_checks_scaled_size() {
    let mut area = StagingArea::at(scratch_root("check"), StagedFormat::Png);
    area.create_input_dir().unwrap();
    area.create_output_dir().unwrap();
    for i in 0..3u64 {
        area.stage_frame(FrameIndex(i), &FrameRgb8::filled(3, 2, [5, 5, 5]))
            .unwrap();
    }

    area.write_output(FrameIndex(0), &FrameRgb8::filled(6, 4, [5, 5, 5]))
        .unwrap();
    area.check_output(FrameIndex(0), 2).unwrap();

    area.write_output(FrameIndex(1), &FrameRgb8::filled(3, 3, [5, 5, 5]))
        .unwrap();
    assert_eq!(
        area.check_output(FrameIndex(1), 2).unwrap_err().kind(),
        "ValidationError"
    );

    std::fs::write(area.output_path(FrameIndex(2)), b"not an image").unwrap();
    assert_eq!(
        area.check_output(FrameIndex(2), 2).unwrap_err().kind(),
        "StagingIOError"
    );

    area.cleanup().unwrap();
}
