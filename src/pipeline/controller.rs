use crate::{
    config::PipelineConfig,
    engine::Engine,
    foundation::{
        core::{FileName, OutputVideo, ShiftFrames},
        error::{InverlayError, InverlayResult},
    },
    pipeline::filters::{composite_args, invert_args},
    status::StatusSink,
};

/// Where a run currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Staging,
    Inverting,
    Compositing,
    Fetching,
    Done,
    Failed,
}

impl PipelineState {
    /// Status-line text for this state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Staging => "Loading video...",
            Self::Inverting => "Creating inverted copy...",
            Self::Compositing => "Processing video effect...",
            Self::Fetching => "Finalizing...",
            Self::Done => "Processing complete!",
            Self::Failed => "Processing failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Sequences the engine calls of a single run.
///
/// `Idle -> Staging -> Inverting -> Compositing -> Fetching -> Done`, with any stage error
/// moving to `Failed`. A controller runs once; build a new one for the next run.
#[derive(Debug)]
pub struct PipelineController {
    cfg: PipelineConfig,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl PipelineController {
    pub fn new(cfg: PipelineConfig) -> Self {
        Self {
            cfg,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run the full pipeline on `input`.
    ///
    /// Rejected with [`InverlayError::AlreadyRunning`] unless the controller is `Idle`; the
    /// current state is left alone in that case. Stage errors are returned as-is after moving to
    /// `Failed`.
    #[tracing::instrument(skip_all, fields(input_len = input.len(), shift = shift.get()))]
    pub fn run(
        &mut self,
        engine: &mut dyn Engine,
        input: &[u8],
        shift: ShiftFrames,
        status: &StatusSink,
    ) -> InverlayResult<OutputVideo> {
        if self.state != PipelineState::Idle {
            return Err(InverlayError::AlreadyRunning);
        }

        match self.drive(engine, input, shift, status) {
            Ok(out) => {
                self.enter(PipelineState::Done, status);
                Ok(out)
            }
            Err(err) => {
                tracing::warn!(failed_in = ?self.state, error = %err, "pipeline run failed");
                self.enter(PipelineState::Failed, status);
                Err(err)
            }
        }
    }

    fn drive(
        &mut self,
        engine: &mut dyn Engine,
        input: &[u8],
        shift: ShiftFrames,
        status: &StatusSink,
    ) -> InverlayResult<OutputVideo> {
        let input_name = FileName::input();
        let inverted_name = FileName::inverted();
        let output_name = FileName::output();

        self.enter(PipelineState::Staging, status);
        if input.is_empty() {
            return Err(InverlayError::stage("input video is empty"));
        }
        engine.stage_input(&input_name, input)?;

        self.enter(PipelineState::Inverting, status);
        engine.run_filter(&invert_args(&input_name, &inverted_name))?;

        self.enter(PipelineState::Compositing, status);
        engine.run_filter(&composite_args(
            &self.cfg,
            shift,
            &input_name,
            &inverted_name,
            &output_name,
        ))?;

        self.enter(PipelineState::Fetching, status);
        let bytes = engine.read_output(&output_name)?;
        if bytes.is_empty() {
            return Err(InverlayError::read(format!("'{output_name}' is empty")));
        }

        Ok(OutputVideo::mp4(bytes))
    }

    fn enter(&mut self, next: PipelineState, status: &StatusSink) {
        self.state = next;
        self.history.push(next);
        status.stage(next);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/controller.rs"]
mod tests;
