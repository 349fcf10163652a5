/// Failure reported by a host speech engine command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors surfaced by the speech session controller.
///
/// None of these is fatal: each one halts the current speech session only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    /// The host offers no speech-recognition capability.
    #[error("Speech recognition not supported in this environment")]
    UnsupportedEnvironment,

    /// The engine rejected the initial start request.
    #[error("Failed to start speech recognition: {0}")]
    StartFailure(String),

    /// The engine reported an error (e.g. `no-speech`, `not-allowed`).
    #[error("Error: {0}")]
    Recognition(String),

    /// Re-issuing start after an end-of-session notification threw.
    #[error("Failed to restart speech recognition: {0}")]
    RestartFailure(String),
}
