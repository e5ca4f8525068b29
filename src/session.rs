use std::sync::{
    Mutex, MutexGuard, OnceLock,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    config::PipelineConfig,
    engine::{Engine, EngineInfo},
    foundation::{
        core::{OutputVideo, ShiftFrames},
        error::{InverlayError, InverlayResult},
    },
    pipeline::controller::PipelineController,
    status::{StatusEvent, StatusObserver, StatusSink, status_channel},
};

#[derive(Debug, Default)]
struct SessionData {
    input: Option<Vec<u8>>,
    shift: ShiftFrames,
    output: Option<OutputVideo>,
}

/// One user's working state: engine, selected input, shift, last output and status line.
///
/// A session is `Sync` and can be shared across threads. Only one run is in flight at a time;
/// a second [`Session::process`] call while busy is rejected instead of queued, since the engine's
/// virtual filesystem uses fixed file names.
pub struct Session<E: Engine> {
    cfg: PipelineConfig,
    engine: Mutex<E>,

    info: OnceLock<EngineInfo>,
    init_failed: AtomicBool,
    busy: AtomicBool,

    data: Mutex<SessionData>,
    status: StatusSink,
    observer: Mutex<StatusObserver>,
}

/// Clears the busy flag on every exit path of a run.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<E: Engine> Session<E> {
    /// Wrap an uninitialized engine. Nothing is loaded until [`Session::initialize`].
    pub fn new(engine: E, cfg: PipelineConfig) -> Self {
        let (status, observer) = status_channel();
        Self {
            cfg,
            engine: Mutex::new(engine),
            info: OnceLock::new(),
            init_failed: AtomicBool::new(false),
            busy: AtomicBool::new(false),
            data: Mutex::new(SessionData::default()),
            status,
            observer: Mutex::new(observer),
        }
    }

    /// Load the engine. A no-op once ready.
    ///
    /// Failure is final for this session: later calls return the init error again without
    /// retrying. Build a new session to try again.
    #[tracing::instrument(skip_all)]
    pub fn initialize(&self) -> InverlayResult<EngineInfo> {
        if self.init_failed.load(Ordering::Acquire) {
            return Err(earlier_init_failure());
        }

        let mut engine = lock(&self.engine)?;
        if let Some(info) = self.info.get() {
            return Ok(info.clone());
        }
        // Another caller may have failed while this one waited for the lock.
        if self.init_failed.load(Ordering::Acquire) {
            return Err(earlier_init_failure());
        }

        self.status.message("Loading FFmpeg...");
        match engine.initialize(self.status.clone()) {
            Ok(info) => {
                let info = self.info.get_or_init(|| info).clone();
                self.status.message("FFmpeg loaded successfully!");
                Ok(info)
            }
            Err(err) => {
                self.init_failed.store(true, Ordering::Release);
                self.status.message(format!("Error loading FFmpeg: {err}"));
                Err(err)
            }
        }
    }

    /// Replace the selected input. Allowed while a run is in flight; that run keeps its own copy.
    pub fn select_input(&self, bytes: Vec<u8>) -> InverlayResult<()> {
        lock(&self.data)?.input = Some(bytes);
        self.status.message("Video uploaded successfully!");
        Ok(())
    }

    /// Change the temporal shift. Rejected while a run is in flight.
    pub fn set_shift(&self, frames: u32) -> InverlayResult<ShiftFrames> {
        if self.is_busy() {
            return Err(InverlayError::AlreadyRunning);
        }
        let shift = ShiftFrames::new(frames)?;
        lock(&self.data)?.shift = shift;
        Ok(shift)
    }

    /// Run the invert-and-overlay pipeline on the selected input.
    ///
    /// Rejected, in this order, when the engine is not ready, a run is already in flight, or no
    /// input is selected. The previous output is dropped before the run starts, so a failed run
    /// leaves no output behind.
    pub fn process(&self) -> InverlayResult<OutputVideo> {
        if !self.is_ready() {
            return Err(InverlayError::NotReady);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(InverlayError::AlreadyRunning);
        }
        let _busy = BusyGuard(&self.busy);

        let (input, shift) = {
            let mut data = lock(&self.data)?;
            let Some(input) = data.input.clone() else {
                return Err(InverlayError::NoInput);
            };
            data.output = None;
            (input, data.shift)
        };

        self.status.message("Processing video...");
        let result = {
            let mut engine = lock(&self.engine)?;
            let mut controller = PipelineController::new(self.cfg.clone());
            controller.run(&mut *engine, &input, shift, &self.status)
        };

        match result {
            Ok(out) => {
                lock(&self.data)?.output = Some(out.clone());
                Ok(out)
            }
            Err(err) => {
                self.status.message(format!("Processing failed: {err}"));
                Err(err)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.info.get().is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn has_input(&self) -> bool {
        lock(&self.data).map(|d| d.input.is_some()).unwrap_or(false)
    }

    pub fn shift(&self) -> ShiftFrames {
        lock(&self.data).map(|d| d.shift).unwrap_or_default()
    }

    /// Output of the last successful run, if the most recent run succeeded.
    pub fn output(&self) -> Option<OutputVideo> {
        lock(&self.data).ok().and_then(|d| d.output.clone())
    }

    /// Current status line.
    pub fn status(&self) -> Option<String> {
        let mut observer = lock(&self.observer).ok()?;
        observer.latest().map(str::to_string)
    }

    /// Every status event emitted since the last call, in order.
    pub fn drain_status(&self) -> Vec<StatusEvent> {
        lock(&self.observer).map(|mut o| o.drain()).unwrap_or_default()
    }
}

fn earlier_init_failure() -> InverlayError {
    InverlayError::init("engine failed to load earlier in this session; start a new session")
}

fn lock<T>(m: &Mutex<T>) -> InverlayResult<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|_| InverlayError::Other(anyhow::anyhow!("session state lock poisoned")))
}
