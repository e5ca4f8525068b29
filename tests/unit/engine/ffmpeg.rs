use super::*;
use crate::status::{StatusEvent, status_channel};

const FILTERS_SAMPLE: &str = "\
Filters:
  T.. = Timeline support
  .S. = Slice threading
  ..C = Command support
  A = Audio input/output
  V = Video input/output
  N = Dynamic number and/or type of input/output
  | = Source or sink filter
 TSC colorchannelmixer V->V       Adjust colors by mixing color channels.
 ... format            V->V       Convert the input video to one of the specified pixel formats.
 TS. negate            V->V       Negate input video.
 TSC overlay           VV->V      Overlay a video source on top of the input.
 ... setpts            V->V       Set PTS for the output video frame.
";

#[test]
fn listed_names_reads_second_column() {
    let names = listed_names(FILTERS_SAMPLE);
    for f in REQUIRED_FILTERS {
        assert!(names.contains(f), "missing {f}");
    }
    assert!(!names.contains("blend"));
}

#[test]
fn listed_names_finds_encoders() {
    let listing = concat!(
        "Encoders:\n ------\n",
        " V....D libx264              libx264 H.264 / AVC\n",
        " A....D aac                  AAC (Advanced Audio Coding)\n",
    );
    let names = listed_names(listing);
    assert!(names.contains("libx264"));
    assert!(names.contains("aac"));
}

#[test]
fn forward_log_splits_progress_lines_and_keeps_tail() {
    let (sink, mut observer) = status_channel();
    let raw = concat!(
        "Input #0, mov,mp4\nframe=    1 fps=0.0\r",
        "frame=    2 fps=0.0\r\nconversion failed!\n",
    )
    .as_bytes();
    let tail = forward_log(&raw[..], &sink);

    assert_eq!(
        tail,
        vec![
            "Input #0, mov,mp4".to_string(),
            "frame=    1 fps=0.0".to_string(),
            "frame=    2 fps=0.0".to_string(),
            "conversion failed!".to_string(),
        ]
    );
    let logs: Vec<StatusEvent> = observer.drain();
    assert_eq!(logs.len(), 4);
    assert_eq!(observer.latest(), Some("conversion failed!"));
}

#[test]
fn forward_log_tail_is_bounded() {
    let sink = StatusSink::disconnected();
    let raw: String = (0..20).map(|i| format!("line {i}\n")).collect();
    let tail = forward_log(raw.as_bytes(), &sink);
    assert_eq!(tail.len(), LOG_TAIL_LINES);
    assert_eq!(tail.last().map(String::as_str), Some("line 19"));
}

#[test]
fn uninitialized_engine_rejects_every_operation() {
    let mut engine = FfmpegEngine::new(&PipelineConfig::default());
    assert!(!engine.is_ready());
    assert!(engine.scratch_dir().is_none());

    assert!(matches!(
        engine.stage_input(&FileName::input(), b"bytes"),
        Err(InverlayError::Stage(_))
    ));
    assert!(matches!(
        engine.run_filter(&["-i", "input.mp4", "out.mp4"].map(String::from)),
        Err(InverlayError::Exec(_))
    ));
    assert!(matches!(
        engine.read_output(&FileName::output()),
        Err(InverlayError::Read(_))
    ));
}

#[test]
fn missing_binary_is_an_init_error() {
    let cfg = PipelineConfig {
        ffmpeg_bin: PathBuf::from("/nonexistent/inverlay-test/ffmpeg"),
        ..PipelineConfig::default()
    };
    let mut engine = FfmpegEngine::new(&cfg);
    let err = engine.initialize(StatusSink::disconnected()).unwrap_err();
    assert!(matches!(err, InverlayError::Init(_)));
    assert!(!engine.is_ready());
}

#[test]
fn remove_if_exists_tolerates_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.mp4");
    remove_if_exists(&path).unwrap();
    std::fs::write(&path, b"x").unwrap();
    remove_if_exists(&path).unwrap();
    assert!(!path.exists());
}
