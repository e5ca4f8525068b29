use crate::config::{PipelineConfig, ShiftMode};
use crate::foundation::core::{FileName, ShiftFrames};

/// Arguments producing a colour-negated copy of `input`.
pub fn invert_args(input: &FileName, inverted: &FileName) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        "-vf".to_string(),
        "negate".to_string(),
        inverted.to_string(),
    ]
}

/// Timestamp offset (in seconds, as an ffmpeg expression) applied to the inverted copy.
pub fn shift_offset(cfg: &PipelineConfig, shift: ShiftFrames) -> String {
    match cfg.shift_mode {
        ShiftMode::Frames => format!("{}/{}", shift.get(), cfg.time_base_fps),
        ShiftMode::Legacy => format!("{}", cfg.legacy_shift_seconds),
    }
}

/// Filter graph: inverted copy at fixed opacity, shifted forward, overlaid on the original.
pub fn composite_graph(cfg: &PipelineConfig, shift: ShiftFrames) -> String {
    format!(
        "[1]format=yuva444p,colorchannelmixer=aa={},setpts=PTS+{}/TB[in2];[0][in2]overlay",
        cfg.overlay_opacity,
        shift_offset(cfg, shift)
    )
}

/// Arguments compositing `inverted` over `input` into `output`.
pub fn composite_args(
    cfg: &PipelineConfig,
    shift: ShiftFrames,
    input: &FileName,
    inverted: &FileName,
    output: &FileName,
) -> Vec<String> {
    vec![
        "-i".to_string(),
        input.to_string(),
        "-i".to_string(),
        inverted.to_string(),
        "-filter_complex".to_string(),
        composite_graph(cfg, shift),
        "-c:v".to_string(),
        cfg.video_codec.clone(),
        "-preset".to_string(),
        cfg.preset.clone(),
        output.to_string(),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/filters.rs"]
mod tests;
