//! inverlay turns a video into an invert-and-overlay effect.
//!
//! A run has two engine invocations: the input is colour-negated, then the negated copy is made
//! half transparent, shifted forward in time and overlaid on the original.
//!
//! # Pieces
//!
//! - [`Engine`]: narrow adapter over a media engine with a flat virtual filesystem
//!   (stage bytes, run a filter command line, read bytes back). [`FfmpegEngine`] drives the
//!   system `ffmpeg` binary.
//! - [`PipelineController`]: sequences one run through
//!   `Idle -> Staging -> Inverting -> Compositing -> Fetching -> Done` (or `Failed`).
//! - [`Session`]: ready/busy gating, selected input, shift parameter, last output, and the rolling
//!   status line fed by a [`StatusSink`].
#![forbid(unsafe_code)]

mod config;
mod engine;
mod foundation;
mod pipeline;
mod session;
mod status;

pub use config::{PipelineConfig, ShiftMode};
pub use engine::ffmpeg::{FfmpegEngine, REQUIRED_FILTERS, ensure_parent_dir, is_ffmpeg_on_path};
pub use engine::{Engine, EngineInfo};
pub use foundation::core::{FileName, OUTPUT_CONTENT_TYPE, OutputVideo, ShiftFrames};
pub use foundation::error::{InverlayError, InverlayResult};
pub use pipeline::controller::{PipelineController, PipelineState};
pub use pipeline::filters::{composite_args, composite_graph, invert_args, shift_offset};
pub use session::Session;
pub use status::{StatusEvent, StatusObserver, StatusSink, status_channel};
