use std::{
    collections::{BTreeSet, VecDeque},
    io::BufReader,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;
use tempfile::TempDir;

use crate::{
    config::PipelineConfig,
    engine::{Engine, EngineInfo},
    foundation::{
        core::FileName,
        error::{InverlayError, InverlayResult},
    },
    status::StatusSink,
};

/// Filters the invert and composite stages rely on.
pub const REQUIRED_FILTERS: &[&str] =
    &["negate", "format", "colorchannelmixer", "setpts", "overlay"];

const LOG_TAIL_LINES: usize = 8;

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> InverlayResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Engine backed by the system `ffmpeg` binary.
///
/// The virtual filesystem is a private scratch directory; every invocation runs with that
/// directory as its working directory so plain file names in the argument list resolve inside it.
/// The directory is removed when the engine is dropped.
pub struct FfmpegEngine {
    program: PathBuf,
    scratch_root: Option<PathBuf>,
    encoder: String,

    scratch: Option<TempDir>,
    info: Option<EngineInfo>,
    status: StatusSink,
}

impl FfmpegEngine {
    pub fn new(cfg: &PipelineConfig) -> Self {
        Self {
            program: cfg.ffmpeg_bin.clone(),
            scratch_root: cfg.scratch_root.clone(),
            encoder: cfg.video_codec.clone(),
            scratch: None,
            info: None,
            status: StatusSink::disconnected(),
        }
    }

    /// Location of the virtual filesystem, once initialized.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(TempDir::path)
    }

    fn probe(&self, args: &[&str]) -> InverlayResult<String> {
        let out = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                InverlayError::init(format!(
                    "failed to run '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;
        if !out.status.success() {
            return Err(InverlayError::init(format!(
                "'{} {}' exited with status {}: {}",
                self.program.display(),
                args.join(" "),
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    fn scratch_path(&self) -> Option<PathBuf> {
        self.scratch.as_ref().map(|d| d.path().to_path_buf())
    }
}

impl Engine for FfmpegEngine {
    #[tracing::instrument(skip_all, fields(program = %self.program.display()))]
    fn initialize(&mut self, status: StatusSink) -> InverlayResult<EngineInfo> {
        if let Some(info) = &self.info {
            return Ok(info.clone());
        }

        let version = self.probe(&["-version"])?;
        let version = version
            .lines()
            .next()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| InverlayError::init("ffmpeg -version printed nothing"))?
            .to_string();

        let filters = self.probe(&["-hide_banner", "-filters"])?;
        let available = listed_names(&filters);
        let missing: Vec<&str> = REQUIRED_FILTERS
            .iter()
            .copied()
            .filter(|f| !available.contains(f))
            .collect();
        if !missing.is_empty() {
            return Err(InverlayError::init(format!(
                "ffmpeg build lacks required filters: {}",
                missing.join(", ")
            )));
        }

        let encoders = self.probe(&["-hide_banner", "-encoders"])?;
        if !listed_names(&encoders).contains(self.encoder.as_str()) {
            return Err(InverlayError::init(format!(
                "ffmpeg build lacks encoder '{}'",
                self.encoder
            )));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("inverlay-");
        let scratch = match &self.scratch_root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(|e| {
                    InverlayError::init(format!(
                        "failed to create scratch root '{}': {e}",
                        root.display()
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| InverlayError::init(format!("failed to create scratch directory: {e}")))?;

        tracing::info!(scratch = %scratch.path().display(), %version, "ffmpeg engine ready");
        status.log(version.clone());

        let info = EngineInfo { version };
        self.scratch = Some(scratch);
        self.status = status;
        self.info = Some(info.clone());
        Ok(info)
    }

    fn is_ready(&self) -> bool {
        self.info.is_some()
    }

    fn stage_input(&mut self, name: &FileName, bytes: &[u8]) -> InverlayResult<()> {
        let Some(dir) = self.scratch_path() else {
            return Err(InverlayError::stage("engine is not initialized"));
        };
        if bytes.is_empty() {
            return Err(InverlayError::stage(format!(
                "refusing to stage empty input as '{name}'"
            )));
        }
        std::fs::write(dir.join(name.as_str()), bytes)
            .map_err(|e| InverlayError::stage(format!("failed to write '{name}': {e}")))?;
        tracing::debug!(%name, len = bytes.len(), "staged input");
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(args = ?args))]
    fn run_filter(&mut self, args: &[String]) -> InverlayResult<()> {
        let Some(dir) = self.scratch_path() else {
            return Err(InverlayError::exec("engine is not initialized"));
        };
        let Some(last) = args.last() else {
            return Err(InverlayError::exec("filter invocation needs at least an output"));
        };
        let target = FileName::new(last.as_str())
            .map_err(|e| InverlayError::exec(format!("invalid output target: {e}")))?;
        let target_path = dir.join(target.as_str());
        remove_if_exists(&target_path)?;

        let mut child = Command::new(&self.program)
            .current_dir(&dir)
            .args(["-hide_banner", "-nostdin", "-y"])
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| InverlayError::exec(format!("failed to spawn ffmpeg: {e}")))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| InverlayError::exec("failed to open ffmpeg stderr (unexpected)"))?;
        let sink = self.status.clone();
        let drain = std::thread::spawn(move || forward_log(BufReader::new(stderr), &sink));

        let exit = match child.wait() {
            Ok(exit) => exit,
            Err(e) => {
                let _ = child.kill();
                let _ = drain.join();
                remove_if_exists(&target_path)?;
                return Err(InverlayError::exec(format!("failed to wait for ffmpeg: {e}")));
            }
        };
        let tail = drain
            .join()
            .map_err(|_| InverlayError::exec("ffmpeg log reader panicked"))?;

        if !exit.success() {
            remove_if_exists(&target_path)?;
            return Err(InverlayError::exec(format!(
                "ffmpeg exited with status {exit}: {}",
                tail.join("\n")
            )));
        }
        Ok(())
    }

    fn read_output(&mut self, name: &FileName) -> InverlayResult<Vec<u8>> {
        let Some(dir) = self.scratch_path() else {
            return Err(InverlayError::read("engine is not initialized"));
        };
        match std::fs::read(dir.join(name.as_str())) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(InverlayError::not_found(name.as_str()))
            }
            Err(e) => Err(InverlayError::read(format!("failed to read '{name}': {e}"))),
        }
    }
}

/// Forward every log line to `sink` and return the last few for error reporting.
///
/// ffmpeg rewrites its progress line with `\r`, so both `\r` and `\n` end a line.
fn forward_log(mut reader: impl std::io::BufRead, sink: &StatusSink) -> Vec<String> {
    let mut tail = VecDeque::with_capacity(LOG_TAIL_LINES);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let chunk = String::from_utf8_lossy(&buf);
        for line in chunk.split(['\r', '\n']).map(str::trim_end) {
            if line.is_empty() {
                continue;
            }
            sink.log(line);
            if tail.len() == LOG_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line.to_string());
        }
    }
    tail.into()
}

/// Names from an `ffmpeg -filters` / `ffmpeg -encoders` listing (second column).
fn listed_names(listing: &str) -> BTreeSet<&str> {
    listing
        .lines()
        .filter_map(|l| {
            let mut cols = l.split_whitespace();
            let _flags = cols.next()?;
            cols.next()
        })
        .collect()
}

fn remove_if_exists(path: &Path) -> InverlayResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(InverlayError::exec(format!(
            "failed to clear stale '{}': {e}",
            path.display()
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/ffmpeg.rs"]
mod tests;
