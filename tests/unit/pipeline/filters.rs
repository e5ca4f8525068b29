use super::*;

fn shift(n: u32) -> ShiftFrames {
    ShiftFrames::new(n).unwrap()
}

#[test]
fn invert_args_match_command_line() {
    assert_eq!(
        invert_args(&FileName::input(), &FileName::inverted()),
        vec!["-i", "input.mp4", "-vf", "negate", "inverted.mp4"]
    );
}

#[test]
fn frames_mode_wires_shift_through() {
    let cfg = PipelineConfig::default();
    assert_eq!(shift_offset(&cfg, shift(5)), "5/30");
    assert_eq!(shift_offset(&cfg, shift(0)), "0/30");
    assert_eq!(
        composite_graph(&cfg, shift(12)),
        "[1]format=yuva444p,colorchannelmixer=aa=0.5,setpts=PTS+12/30/TB[in2];[0][in2]overlay"
    );
}

#[test]
fn legacy_mode_ignores_shift() {
    let cfg = PipelineConfig {
        shift_mode: ShiftMode::Legacy,
        ..PipelineConfig::default()
    };
    assert_eq!(shift_offset(&cfg, shift(0)), "0.0333");
    assert_eq!(shift_offset(&cfg, shift(30)), "0.0333");
    assert_eq!(
        composite_graph(&cfg, shift(7)),
        "[1]format=yuva444p,colorchannelmixer=aa=0.5,setpts=PTS+0.0333/TB[in2];[0][in2]overlay"
    );
}

#[test]
fn composite_args_carry_codec_and_output_last() {
    let cfg = PipelineConfig {
        time_base_fps: 25,
        overlay_opacity: 0.25,
        preset: "veryfast".to_string(),
        ..PipelineConfig::default()
    };
    let args = composite_args(
        &cfg,
        shift(5),
        &FileName::input(),
        &FileName::inverted(),
        &FileName::output(),
    );
    assert_eq!(
        args,
        vec![
            "-i",
            "input.mp4",
            "-i",
            "inverted.mp4",
            "-filter_complex",
            "[1]format=yuva444p,colorchannelmixer=aa=0.25,setpts=PTS+5/25/TB[in2];[0][in2]overlay",
            "-c:v",
            "libx264",
            "-preset",
            "veryfast",
            "output.mp4",
        ]
    );
}
