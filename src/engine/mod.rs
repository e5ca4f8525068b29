//! Media engine adapter.
//!
//! The engine owns a flat virtual filesystem. Callers stage input bytes under a name, run
//! command-line style filter invocations that read and write files in that namespace, and read the
//! resulting files back.

use crate::foundation::core::FileName;
use crate::foundation::error::InverlayResult;
use crate::status::StatusSink;

/// `ffmpeg` child-process engine.
pub mod ffmpeg;

/// What initialization found out about the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInfo {
    /// Human-readable version line reported by the engine.
    pub version: String,
}

/// Contract every media engine backend fulfills.
///
/// All calls block until the engine is done. The virtual filesystem is a single shared
/// namespace, so callers must not interleave two pipelines on one engine.
pub trait Engine: Send {
    /// Load the engine and register `status` as the sink for its log stream.
    ///
    /// Fails with [`crate::InverlayError::Init`]. Callers gate on [`Engine::is_ready`]; calling
    /// this twice is not required to be meaningful.
    fn initialize(&mut self, status: StatusSink) -> InverlayResult<EngineInfo>;

    /// Whether [`Engine::initialize`] has succeeded.
    fn is_ready(&self) -> bool;

    /// Copy `bytes` into the virtual filesystem as `name`, replacing any existing file.
    ///
    /// Fails with [`crate::InverlayError::Stage`] for empty input or an uninitialized engine.
    fn stage_input(&mut self, name: &FileName, bytes: &[u8]) -> InverlayResult<()>;

    /// Run one filter/transcode invocation, arguments interpreted as on a command line.
    ///
    /// Fails with [`crate::InverlayError::Exec`] on a non-zero exit. A failed run must not leave
    /// its output target readable.
    fn run_filter(&mut self, args: &[String]) -> InverlayResult<()>;

    /// Read back the bytes of a virtual file.
    ///
    /// Fails with [`crate::InverlayError::NotFound`] when the file does not exist.
    fn read_output(&mut self, name: &FileName) -> InverlayResult<Vec<u8>>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn initialize(&mut self, status: StatusSink) -> InverlayResult<EngineInfo> {
        (**self).initialize(status)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn stage_input(&mut self, name: &FileName, bytes: &[u8]) -> InverlayResult<()> {
        (**self).stage_input(name, bytes)
    }

    fn run_filter(&mut self, args: &[String]) -> InverlayResult<()> {
        (**self).run_filter(args)
    }

    fn read_output(&mut self, name: &FileName) -> InverlayResult<Vec<u8>> {
        (**self).read_output(name)
    }
}
