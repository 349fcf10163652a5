//! Host speech-recognition seam.
//!
//! A host (browser glue, a native recognizer, a test script) implements
//! [`RecognitionHost`]. Engines push [`RecognitionEvent`]s onto the queue they
//! were created with; the session controller is the single consumer.

use tokio::sync::mpsc;

use super::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub continuous: bool,
    pub interim_results: bool,
    pub language: String,
}

impl RecognitionConfig {
    /// Continuous capture with interim results, the only mode the client uses.
    pub fn continuous(language: impl Into<String>) -> Self {
        Self {
            continuous: true,
            interim_results: true,
            language: language.into(),
        }
    }
}

/// One recognized alternative, flagged final or interim by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn final_text(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: true,
        }
    }

    pub fn interim(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
            is_final: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// The engine acknowledged a start request and is capturing audio.
    Started,
    /// A batch of newly recognized alternatives.
    Results(Vec<RecognitionResult>),
    /// The engine ended its session (after stop, or on its own after silence).
    End,
    /// The engine reported an error such as `no-speech` or `not-allowed`.
    Error(String),
}

pub type RecognitionSender = mpsc::UnboundedSender<RecognitionEvent>;
pub type RecognitionReceiver = mpsc::UnboundedReceiver<RecognitionEvent>;

/// Handle to a live engine. Dropping the handle releases the microphone.
pub trait RecognitionEngine: Send {
    fn start(&mut self) -> Result<(), EngineError>;
    fn stop(&mut self);
    fn abort(&mut self);
    /// Some engines only honor this on the next `start`.
    fn set_language(&mut self, language: &str);
}

pub trait RecognitionHost: Send {
    /// Create an engine, or `None` when the host has no recognition capability.
    fn create_engine(
        &self,
        config: RecognitionConfig,
        events: RecognitionSender,
    ) -> Option<Box<dyn RecognitionEngine>>;
}

/// Host without any recognition capability, used by the terminal front end.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRecognitionHost;

impl RecognitionHost for UnavailableRecognitionHost {
    fn create_engine(
        &self,
        _config: RecognitionConfig,
        _events: RecognitionSender,
    ) -> Option<Box<dyn RecognitionEngine>> {
        None
    }
}
