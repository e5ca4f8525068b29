use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = PipelineConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, PipelineConfig::default());
    assert_eq!(cfg.ffmpeg_bin, PathBuf::from("ffmpeg"));
    assert_eq!(cfg.video_codec, "libx264");
    assert_eq!(cfg.preset, "fast");
    assert_eq!(cfg.overlay_opacity, 0.5);
    assert_eq!(cfg.time_base_fps, 30);
    assert_eq!(cfg.shift_mode, ShiftMode::Frames);
}

#[test]
fn shift_mode_parses_snake_case() {
    let cfg = PipelineConfig::from_json_str(r#"{"shift_mode":"legacy"}"#).unwrap();
    assert_eq!(cfg.shift_mode, ShiftMode::Legacy);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = PipelineConfig::from_json_str(r#"{"shift":5}"#).unwrap_err();
    assert!(matches!(err, InverlayError::Validation(_)));
}

#[test]
fn validation_catches_bad_values() {
    let bad = [
        PipelineConfig {
            overlay_opacity: 0.0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            overlay_opacity: 1.5,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            time_base_fps: 0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            legacy_shift_seconds: -1.0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            video_codec: "libx264 -vf negate".to_string(),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            preset: String::new(),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            ffmpeg_bin: PathBuf::new(),
            ..PipelineConfig::default()
        },
    ];
    for cfg in bad {
        assert!(cfg.validate().is_err(), "accepted {cfg:?}");
    }
    assert!(
        PipelineConfig {
            overlay_opacity: 1.0,
            ..PipelineConfig::default()
        }
        .validate()
        .is_ok()
    );
}

#[test]
fn missing_config_file_is_reported() {
    let err = PipelineConfig::from_json_file(Path::new("does/not/exist.json")).unwrap_err();
    assert!(err.to_string().contains("open config"));
}
