use super::*;
use crate::engine::EngineInfo;

/// Engine that must never be reached.
struct Untouchable;

impl Engine for Untouchable {
    fn initialize(&mut self, _status: StatusSink) -> InverlayResult<EngineInfo> {
        panic!("initialize called");
    }
    fn is_ready(&self) -> bool {
        true
    }
    fn stage_input(&mut self, _name: &FileName, _bytes: &[u8]) -> InverlayResult<()> {
        panic!("stage_input called");
    }
    fn run_filter(&mut self, _args: &[String]) -> InverlayResult<()> {
        panic!("run_filter called");
    }
    fn read_output(&mut self, _name: &FileName) -> InverlayResult<Vec<u8>> {
        panic!("read_output called");
    }
}

#[test]
fn only_done_and_failed_are_terminal() {
    use PipelineState::*;
    for s in [Idle, Staging, Inverting, Compositing, Fetching] {
        assert!(!s.is_terminal(), "{s:?}");
    }
    assert!(Done.is_terminal());
    assert!(Failed.is_terminal());
}

#[test]
fn new_controller_starts_idle() {
    let c = PipelineController::new(PipelineConfig::default());
    assert_eq!(c.state(), PipelineState::Idle);
    assert_eq!(c.history(), &[PipelineState::Idle]);
}

#[test]
fn empty_input_fails_before_touching_engine() {
    let mut c = PipelineController::new(PipelineConfig::default());
    let err = c
        .run(
            &mut Untouchable,
            &[],
            ShiftFrames::default(),
            &StatusSink::disconnected(),
        )
        .unwrap_err();
    assert!(matches!(err, InverlayError::Stage(_)));
    assert_eq!(
        c.history(),
        &[
            PipelineState::Idle,
            PipelineState::Staging,
            PipelineState::Failed
        ]
    );
}

#[test]
fn run_outside_idle_is_rejected_without_state_change() {
    let mut c = PipelineController::new(PipelineConfig::default());
    c.state = PipelineState::Compositing;
    let err = c
        .run(
            &mut Untouchable,
            b"video",
            ShiftFrames::default(),
            &StatusSink::disconnected(),
        )
        .unwrap_err();
    assert!(matches!(err, InverlayError::AlreadyRunning));
    assert_eq!(c.state(), PipelineState::Compositing);
    assert_eq!(c.history(), &[PipelineState::Idle]);
}
