use super::*;

fn write_tmp(tag: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "frameshift_config_{tag}_{}_{}.json",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn defaults_match_reference_behaviour() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg.strategy, RouteStrategy::InProcess);
    assert_eq!(cfg.progress_every, 30);
    assert_eq!(
        cfg.direct_target,
        TargetSize {
            width: 3840,
            height: 2160
        }
    );
    assert_eq!(cfg.upscaler_bin, PathBuf::from("realesrgan-ncnn-vulkan"));
    cfg.validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let path = write_tmp(
        "partial",
        r#"{"strategy": "ai-with-fallback", "upscaler_bin": "/opt/re/bin", "staged_image_format": "jpg"}"#,
    );
    let cfg = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.strategy, RouteStrategy::AiWithFallback);
    assert_eq!(cfg.upscaler_bin, PathBuf::from("/opt/re/bin"));
    assert_eq!(cfg.staged_image_format, StagedFormat::Jpg);
    assert_eq!(cfg.progress_every, 30);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn unknown_fields_and_bad_values_are_rejected() {
    let path = write_tmp("unknown", r#"{"strategy": "in-process", "bogus": 1}"#);
    assert!(PipelineConfig::from_json_file(&path).is_err());
    std::fs::remove_file(path).unwrap();

    let path = write_tmp("zero", r#"{"progress_every": 0}"#);
    assert!(matches!(
        PipelineConfig::from_json_file(&path),
        Err(FrameshiftError::Validation(_))
    ));
    std::fs::remove_file(path).unwrap();

    let odd = PipelineConfig {
        direct_target: TargetSize {
            width: 101,
            height: 100,
        },
        ..PipelineConfig::default()
    };
    assert!(odd.validate().is_ok());
    let zero = PipelineConfig {
        direct_target: TargetSize {
            width: 0,
            height: 100,
        },
        ..PipelineConfig::default()
    };
    assert!(zero.validate().is_err());
    let crf = PipelineConfig {
        crf: Some(60),
        ..PipelineConfig::default()
    };
    assert!(crf.validate().is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(PipelineConfig::from_json_file(Path::new("/no/such/frameshift.json")).is_err());
}
