use super::*;

fn cfg(w: u32, h: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        fps: Fps::new(30, 1).unwrap(),
    }
}

fn scratch(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "frameshift_sink_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn begin_validates_geometry_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(scratch("geom").join("out.mp4")));
    assert!(sink.begin(cfg(0, 10)).is_err());
    assert!(
        sink.begin(SinkConfig {
            fps: Fps { num: 0, den: 1 },
            ..cfg(10, 10)
        })
        .is_err()
    );
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(scratch("early").join("out.mp4")));
    let frame = FrameRgb8::filled(2, 2, [0, 0, 0]);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn existing_output_without_overwrite_is_create_error() {
    let dir = scratch("exists");
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("out.mp4");
    std::fs::write(&out, b"x").unwrap();
    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(2, 2)).unwrap_err();
    assert!(matches!(err, FrameshiftError::Create(_)));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn encodes_frames_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = scratch("encode");
    let out = dir.join("nested").join("out.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(16, 16)).unwrap();
    for i in 0..3u64 {
        sink.push_frame(FrameIndex(i), &FrameRgb8::filled(16, 16, [i as u8 * 40, 10, 10]))
            .unwrap();
    }
    assert!(
        sink.push_frame(FrameIndex(3), &FrameRgb8::filled(8, 8, [0, 0, 0]))
            .is_err()
    );
    sink.end().unwrap();
    assert_eq!(sink.frames_written(), 3);
    assert!(out.metadata().unwrap().len() > 0);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn odd_geometry_switches_to_full_chroma() {
    assert_eq!(output_pix_fmt(100, 100), "yuv420p");
    assert_eq!(output_pix_fmt(101, 75), "yuv444p");
    assert_eq!(output_pix_fmt(100, 75), "yuv444p");
}

#[test]
fn directory_as_output_is_create_error() {
    let dir = scratch("dir_out");
    std::fs::create_dir_all(&dir).unwrap();
    let err = FfmpegSink::new(FfmpegSinkOpts::new(&dir))
        .begin(cfg(2, 2))
        .unwrap_err();
    assert_eq!(err.kind(), "CreateError");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[cfg(unix)]
#[test]
fn read_only_directory_is_create_error() {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = scratch("readonly");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555)).unwrap();
    // Privileged users ignore directory permissions.
    let writable = std::fs::write(dir.join("write_check"), b"x").is_ok();
    if !writable {
        let out = dir.join("out.mp4");
        let err = FfmpegSink::new(FfmpegSinkOpts::new(&out))
            .begin(cfg(2, 2))
            .unwrap_err();
        assert_eq!(err.kind(), "CreateError");
        assert!(!out.exists());
    }
    std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn encodes_odd_geometry_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = scratch("odd");
    let out = dir.join("out.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&out));
    sink.begin(cfg(101, 75)).unwrap();
    for i in 0..2u64 {
        sink.push_frame(FrameIndex(i), &FrameRgb8::filled(101, 75, [200, 90, 30]))
            .unwrap();
    }
    sink.end().unwrap();
    assert_eq!(sink.frames_written(), 2);
    assert!(out.metadata().unwrap().len() > 0);
    std::fs::remove_dir_all(&dir).unwrap();
}
