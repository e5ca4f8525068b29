/// Convenience result type used across inverlay.
pub type InverlayResult<T> = Result<T, InverlayError>;

/// Error taxonomy shared by the engine adapter, the pipeline controller and the session.
#[derive(thiserror::Error, Debug)]
pub enum InverlayError {
    /// The engine could not be loaded. Fatal for the session.
    #[error("init error: {0}")]
    Init(String),

    /// Input could not be staged into the engine's virtual filesystem.
    #[error("stage error: {0}")]
    Stage(String),

    /// A filter invocation failed inside the engine.
    #[error("exec error: {0}")]
    Exec(String),

    /// A requested virtual file does not exist.
    #[error("read error: '{0}' not found")]
    NotFound(String),

    /// A virtual file exists but could not be read.
    #[error("read error: {0}")]
    Read(String),

    /// A run is already in flight (or the controller has left `Idle`).
    #[error("rejected: a run is already in progress")]
    AlreadyRunning,

    /// The engine has not been initialized yet.
    #[error("rejected: engine is not initialized")]
    NotReady,

    /// No input video has been selected.
    #[error("rejected: no input video selected")]
    NoInput,

    /// Invalid configuration or caller-provided values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InverlayError {
    /// Build a [`InverlayError::Init`] value.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    /// Build a [`InverlayError::Stage`] value.
    pub fn stage(msg: impl Into<String>) -> Self {
        Self::Stage(msg.into())
    }

    /// Build a [`InverlayError::Exec`] value.
    pub fn exec(msg: impl Into<String>) -> Self {
        Self::Exec(msg.into())
    }

    /// Build a [`InverlayError::NotFound`] value.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Build a [`InverlayError::Read`] value.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::Read(msg.into())
    }

    /// Build a [`InverlayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether the session can keep going after this error.
    ///
    /// Only initialization failures are terminal; the user has to start a new session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
