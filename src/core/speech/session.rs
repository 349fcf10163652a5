//! Continuous speech-recognition session with restart-on-end.
//!
//! State machine: `Idle → Starting → Listening → (Ending | Errored) → Idle`.
//! An `End` notification while the session is still wanted re-issues start
//! (some engines stop on their own after a stretch of silence). Transcript
//! text survives restarts; only `start` and `stop` clear it.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::error::SpeechError;
use super::recognition::{
    RecognitionConfig, RecognitionEngine, RecognitionEvent, RecognitionHost, RecognitionReceiver,
    RecognitionResult,
};

/// Delay between stopping a session and auto-submitting its transcript, so
/// the engine can settle.
pub const AUTO_SUBMIT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechState {
    #[default]
    Idle,
    Starting,
    Listening,
    Ending,
    Errored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechSession {
    pub is_active: bool,
    pub is_listening: bool,
    pub accumulated_final_text: String,
    pub pending_interim_text: String,
    pub language_tag: String,
    pub last_error: Option<String>,
}

/// What handling one recognition event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The event belonged to no live session.
    Ignored,
    Listening,
    Transcript,
    Restarted,
    /// The session is over; the error explains why.
    Failed(SpeechError),
}

pub struct SpeechSessionController {
    host: Box<dyn RecognitionHost>,
    engine: Option<Box<dyn RecognitionEngine>>,
    events: Option<RecognitionReceiver>,
    state: SpeechState,
    session: SpeechSession,
    language: String,
}

impl SpeechSessionController {
    pub fn new(host: Box<dyn RecognitionHost>, language: impl Into<String>) -> Self {
        let language = language.into();
        Self {
            host,
            engine: None,
            events: None,
            state: SpeechState::Idle,
            session: SpeechSession {
                language_tag: language.clone(),
                ..SpeechSession::default()
            },
            language,
        }
    }

    pub fn state(&self) -> SpeechState {
        self.state
    }

    pub fn session(&self) -> &SpeechSession {
        &self.session
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active
    }

    /// Start a fresh session. Any session already running is aborted first so
    /// two engines never compete for the microphone.
    pub fn start(&mut self, language: &str) -> Result<(), SpeechError> {
        if self.engine.is_some() {
            debug!("tearing down previous recognition session before restart");
            self.teardown();
        }

        self.language = language.to_string();
        self.session = SpeechSession {
            language_tag: language.to_string(),
            ..SpeechSession::default()
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let config = RecognitionConfig::continuous(language);
        let Some(mut engine) = self.host.create_engine(config, tx) else {
            let err = SpeechError::UnsupportedEnvironment;
            self.session.last_error = Some(err.to_string());
            self.state = SpeechState::Idle;
            return Err(err);
        };

        self.state = SpeechState::Starting;
        if let Err(err) = engine.start() {
            warn!(error = %err, "speech recognition failed to start");
            let err = SpeechError::StartFailure(err.to_string());
            self.session.last_error = Some(err.to_string());
            self.state = SpeechState::Idle;
            return Err(err);
        }

        info!(language, "speech recognition session started");
        self.session.is_active = true;
        self.engine = Some(engine);
        self.events = Some(rx);
        Ok(())
    }

    /// Stop the session. Returns the accumulated final transcript when there
    /// is one, which the caller submits after [`AUTO_SUBMIT_DELAY`].
    pub fn stop(&mut self) -> Option<String> {
        if let Some(mut engine) = self.engine.take() {
            engine.stop();
        }
        self.events = None;

        let was_active = self.session.is_active;
        self.session.is_active = false;
        self.session.is_listening = false;
        self.session.pending_interim_text.clear();
        self.state = SpeechState::Idle;

        let text = std::mem::take(&mut self.session.accumulated_final_text);
        let text = text.trim();
        debug!(was_active, chars = text.len(), "speech recognition session stopped");
        (was_active && !text.is_empty()).then(|| text.to_string())
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
        if self.session.is_active {
            self.session.language_tag = language.to_string();
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_language(language);
        }
    }

    /// Wait for the next event from the live engine. Pends forever while no
    /// session is running, so it can sit in a `select!` unconditionally.
    pub async fn next_event(&mut self) -> Option<RecognitionEvent> {
        match self.events.as_mut() {
            Some(rx) => {
                let event = rx.recv().await;
                if event.is_none() {
                    self.events = None;
                }
                event
            }
            None => std::future::pending().await,
        }
    }

    /// Next already-queued event, without waiting.
    pub fn try_next_event(&mut self) -> Option<RecognitionEvent> {
        self.events.as_mut()?.try_recv().ok()
    }

    /// Handle every event already queued, without waiting.
    pub fn pump(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Some(event) = self.try_next_event() {
            updates.push(self.handle_event(event));
        }
        updates
    }

    pub fn handle_event(&mut self, event: RecognitionEvent) -> SessionUpdate {
        if !self.session.is_active {
            return SessionUpdate::Ignored;
        }

        match event {
            RecognitionEvent::Started => {
                self.state = SpeechState::Listening;
                self.session.is_listening = true;
                SessionUpdate::Listening
            }
            RecognitionEvent::Results(results) => {
                self.apply_results(results);
                SessionUpdate::Transcript
            }
            RecognitionEvent::End => self.restart_after_end(),
            RecognitionEvent::Error(reason) => {
                warn!(%reason, "speech recognition error");
                self.fail(SpeechError::Recognition(reason))
            }
        }
    }

    fn apply_results(&mut self, results: Vec<RecognitionResult>) {
        let mut interim = String::new();
        for result in results {
            if result.is_final {
                let text = result.transcript.trim();
                if text.is_empty() {
                    continue;
                }
                if !self.session.accumulated_final_text.is_empty() {
                    self.session.accumulated_final_text.push(' ');
                }
                self.session.accumulated_final_text.push_str(text);
            } else {
                interim.push_str(&result.transcript);
            }
        }
        // Engines republish the whole interim guess with every event.
        self.session.pending_interim_text = interim.trim().to_string();
    }

    fn restart_after_end(&mut self) -> SessionUpdate {
        self.state = SpeechState::Ending;
        self.session.is_listening = false;

        let Some(engine) = self.engine.as_mut() else {
            return self.fail(SpeechError::RestartFailure("engine handle missing".into()));
        };

        match engine.start() {
            Ok(()) => {
                debug!("recognition ended while active; restarted");
                self.state = SpeechState::Starting;
                SessionUpdate::Restarted
            }
            Err(err) => {
                warn!(error = %err, "failed to restart speech recognition");
                self.fail(SpeechError::RestartFailure(err.to_string()))
            }
        }
    }

    fn fail(&mut self, error: SpeechError) -> SessionUpdate {
        self.teardown();
        self.session.is_active = false;
        self.session.is_listening = false;
        self.session.last_error = Some(error.to_string());
        self.state = SpeechState::Errored;
        SessionUpdate::Failed(error)
    }

    fn teardown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            engine.abort();
        }
        self.events = None;
    }
}
