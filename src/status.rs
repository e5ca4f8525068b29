//! Rolling status line.
//!
//! Engine log lines, pipeline stage changes and lifecycle messages are pushed into a
//! [`StatusSink`]. The presentation side holds the matching [`StatusObserver`] and only ever shows
//! the most recent message.

use std::sync::mpsc;

use crate::pipeline::controller::PipelineState;

/// One update for the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusEvent {
    /// A single line from the engine's log stream.
    Log(String),
    /// The pipeline controller entered a new state.
    Stage(PipelineState),
    /// A lifecycle message (upload, load, failure).
    Message(String),
}

impl StatusEvent {
    /// Text shown for this event on the status line.
    pub fn text(&self) -> String {
        match self {
            Self::Log(line) | Self::Message(line) => line.clone(),
            Self::Stage(state) => state.label().to_string(),
        }
    }
}

/// Push side of the status channel. Cheap to clone; emitting never fails.
#[derive(Clone, Debug)]
pub struct StatusSink {
    tx: Option<mpsc::Sender<StatusEvent>>,
}

impl StatusSink {
    /// A sink with nobody listening. Events are still traced.
    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: StatusEvent) {
        match &event {
            StatusEvent::Log(line) => tracing::debug!(target: "inverlay::engine", "{line}"),
            StatusEvent::Stage(state) => tracing::info!(stage = ?state, "{}", state.label()),
            StatusEvent::Message(msg) => tracing::info!("{msg}"),
        }
        if let Some(tx) = &self.tx {
            // A dropped observer only means nobody is watching any more.
            let _ = tx.send(event);
        }
    }

    pub fn log(&self, line: impl Into<String>) {
        self.emit(StatusEvent::Log(line.into()));
    }

    pub fn message(&self, msg: impl Into<String>) {
        self.emit(StatusEvent::Message(msg.into()));
    }

    pub fn stage(&self, state: PipelineState) {
        self.emit(StatusEvent::Stage(state));
    }
}

/// Receiving side of the status channel.
#[derive(Debug)]
pub struct StatusObserver {
    rx: mpsc::Receiver<StatusEvent>,
    latest: Option<String>,
}

impl StatusObserver {
    /// Take every pending event in emission order.
    pub fn drain(&mut self) -> Vec<StatusEvent> {
        let events: Vec<StatusEvent> = self.rx.try_iter().collect();
        if let Some(last) = events.last() {
            self.latest = Some(last.text());
        }
        events
    }

    /// The current status line: the text of the most recent event seen so far.
    pub fn latest(&mut self) -> Option<&str> {
        self.drain();
        self.latest.as_deref()
    }
}

/// Create a connected sink/observer pair.
pub fn status_channel() -> (StatusSink, StatusObserver) {
    let (tx, rx) = mpsc::channel();
    (StatusSink { tx: Some(tx) }, StatusObserver { rx, latest: None })
}

#[cfg(test)]
#[path = "../tests/unit/status.rs"]
mod tests;
