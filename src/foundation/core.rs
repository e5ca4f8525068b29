use std::fmt;

use crate::foundation::error::{InverlayError, InverlayResult};

/// Content type of every video the pipeline hands back.
pub const OUTPUT_CONTENT_TYPE: &str = "video/mp4";

/// Name of a file inside the engine's virtual filesystem.
///
/// Names are flat: no directory separators, no `.`/`..`, no NUL bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileName(String);

impl FileName {
    /// Staged copy of the user's upload.
    pub const INPUT: &'static str = "input.mp4";
    /// Output of the invert stage.
    pub const INVERTED: &'static str = "inverted.mp4";
    /// Output of the composite stage.
    pub const OUTPUT: &'static str = "output.mp4";

    pub fn new(name: impl Into<String>) -> InverlayResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(InverlayError::validation("file name must be non-empty"));
        }
        if name == "." || name == ".." {
            return Err(InverlayError::validation(format!(
                "file name '{name}' is reserved"
            )));
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(InverlayError::validation(format!(
                "file name '{}' must not contain path separators",
                name.escape_default()
            )));
        }
        Ok(Self(name))
    }

    pub fn input() -> Self {
        Self(Self::INPUT.to_string())
    }

    pub fn inverted() -> Self {
        Self(Self::INVERTED.to_string())
    }

    pub fn output() -> Self {
        Self(Self::OUTPUT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for FileName {
    type Error = InverlayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FileName> for String {
    fn from(value: FileName) -> Self {
        value.0
    }
}

/// Temporal offset of the inverted overlay, in frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftFrames(u32);

impl ShiftFrames {
    pub const MIN: u32 = 0;
    pub const MAX: u32 = 30;
    pub const DEFAULT: u32 = 5;

    pub fn new(frames: u32) -> InverlayResult<Self> {
        if frames > Self::MAX {
            return Err(InverlayError::validation(format!(
                "shift must be within {}..={}, got {frames}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(frames))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for ShiftFrames {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for ShiftFrames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a successful pipeline run, ready for playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputVideo {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

impl OutputVideo {
    pub fn mp4(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: OUTPUT_CONTENT_TYPE,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
