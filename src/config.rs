use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::error::{InverlayError, InverlayResult};

/// How the composite stage turns the shift parameter into a timestamp offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftMode {
    /// Offset is `shift / time_base_fps` seconds.
    #[default]
    Frames,
    /// Offset is the fixed `legacy_shift_seconds`, whatever the shift parameter says.
    Legacy,
}

/// Pipeline and engine settings.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// `ffmpeg` executable. Bare names are looked up on `PATH`.
    pub ffmpeg_bin: PathBuf,
    /// Parent directory of the engine's scratch filesystem. `None` uses the system temp dir.
    pub scratch_root: Option<PathBuf>,
    /// Encoder used by the composite stage.
    pub video_codec: String,
    /// Encoder preset used by the composite stage.
    pub preset: String,
    /// Alpha applied to the inverted copy before it is overlaid.
    pub overlay_opacity: f64,
    /// Frames per second used to convert the shift into seconds.
    pub time_base_fps: u32,
    pub shift_mode: ShiftMode,
    pub legacy_shift_seconds: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            scratch_root: None,
            video_codec: "libx264".to_string(),
            preset: "fast".to_string(),
            overlay_opacity: 0.5,
            time_base_fps: 30,
            shift_mode: ShiftMode::Frames,
            legacy_shift_seconds: 0.0333,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> InverlayResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| InverlayError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> InverlayResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| InverlayError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> InverlayResult<()> {
        if self.ffmpeg_bin.as_os_str().is_empty() {
            return Err(InverlayError::validation("ffmpeg_bin must be non-empty"));
        }
        if !is_plain_token(&self.video_codec) {
            return Err(InverlayError::validation(format!(
                "video_codec '{}' must be a plain encoder name",
                self.video_codec
            )));
        }
        if !is_plain_token(&self.preset) {
            return Err(InverlayError::validation(format!(
                "preset '{}' must be a plain preset name",
                self.preset
            )));
        }
        if !(self.overlay_opacity > 0.0 && self.overlay_opacity <= 1.0) {
            return Err(InverlayError::validation(format!(
                "overlay_opacity must be in (0, 1], got {}",
                self.overlay_opacity
            )));
        }
        if self.time_base_fps == 0 {
            return Err(InverlayError::validation("time_base_fps must be non-zero"));
        }
        if !self.legacy_shift_seconds.is_finite() || self.legacy_shift_seconds < 0.0 {
            return Err(InverlayError::validation(format!(
                "legacy_shift_seconds must be finite and >= 0, got {}",
                self.legacy_shift_seconds
            )));
        }
        Ok(())
    }
}

// Codec and preset land inside an ffmpeg argument list; keep them to simple identifiers.
fn is_plain_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
