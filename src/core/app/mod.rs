//! Event-driven composition root.
//!
//! [`App`] is the single consumer of [`AppEvent`]s. Anything that has to wait
//! (completion calls, the auto-submit debounce, the delayed welcome) runs in
//! a spawned task that reports back through the same queue.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{CompletionClient, CompletionError};
use crate::commands::{self, CommandResult};
use crate::core::language::{find_language, keeps_output_language, DEFAULT_LANGUAGE};
use crate::core::message::Message;
use crate::core::orchestrator::{run_completion, ChatOrchestrator, CompletionReply, PendingSubmit};
use crate::core::persona::Persona;
use crate::core::speech::{
    RecognitionEvent, RecognitionHost, SessionUpdate, SpeechOutput, SpeechSessionController,
    SpeechSynthesizer, AUTO_SUBMIT_DELAY,
};
use crate::utils::logging::LoggingState;


/// Delay before a persona's welcome message is spoken.
pub const WELCOME_SPEECH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub enum AppEvent {
    /// A line typed by the user: a slash command or text to submit.
    Input(String),
    Recognition(RecognitionEvent),
    CompletionFinished {
        pending: PendingSubmit,
        result: Result<CompletionReply, CompletionError>,
    },
    /// Text to submit once the debounce after a stopped recording elapses.
    AutoSubmit { text: String, from_voice: bool },
    SpeakWelcome(String),
}

pub type AppEventSender = mpsc::UnboundedSender<AppEvent>;
pub type AppEventReceiver = mpsc::UnboundedReceiver<AppEvent>;

/// Startup settings, resolved from config and command-line flags.
#[derive(Debug, Clone)]
pub struct AppInitConfig {
    pub persona: Persona,
    pub language: String,
    pub voice_input: bool,
    pub voice_output: bool,
}

impl Default for AppInitConfig {
    fn default() -> Self {
        Self {
            persona: Persona::Default,
            language: DEFAULT_LANGUAGE.to_string(),
            voice_input: false,
            voice_output: true,
        }
    }
}

pub struct App {
    chat: ChatOrchestrator,
    speech: SpeechSessionController,
    client: Arc<dyn CompletionClient>,
    events: AppEventSender,
    pub logging: LoggingState,
    language: String,
    voice_input: bool,
    recording: bool,
    /// Auto-submit that arrived while a reply was pending.
    deferred_submit: Option<(String, bool)>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        init: AppInitConfig,
        client: Arc<dyn CompletionClient>,
        host: Box<dyn RecognitionHost>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        logging: LoggingState,
    ) -> (Self, AppEventReceiver) {
        let output_language = if keeps_output_language(&init.language) {
            DEFAULT_LANGUAGE
        } else {
            init.language.as_str()
        };
        let output =
            SpeechOutput::new(synthesizer, init.voice_output).with_language(output_language);
        let (events, rx) = mpsc::unbounded_channel();

        let app = App {
            chat: ChatOrchestrator::new(init.persona, output),
            speech: SpeechSessionController::new(host, init.language.clone()),
            client,
            events,
            logging,
            language: init.language,
            voice_input: init.voice_input,
            recording: false,
            deferred_submit: None,
            status: None,
            should_quit: false,
        };
        (app, rx)
    }

    /// Show the startup persona, appending (and speaking) its welcome.
    pub fn open(&mut self) {
        self.select_persona(self.chat.active_persona());
    }

    pub fn chat(&self) -> &ChatOrchestrator {
        &self.chat
    }

    pub fn speech(&self) -> &SpeechSessionController {
        &self.speech
    }

    pub fn active_persona(&self) -> Persona {
        self.chat.active_persona()
    }

    pub fn active_messages(&self) -> &[Message] {
        self.chat.active_messages()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn voice_input(&self) -> bool {
        self.voice_input
    }

    pub fn voice_output(&self) -> bool {
        self.chat.speech_output().is_enabled()
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Next event from the live recognition session; pends while idle.
    pub async fn next_recognition_event(&mut self) -> Option<RecognitionEvent> {
        self.speech.next_event().await
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(line) => match commands::process_input(self, &line) {
                CommandResult::Continue => {}
                CommandResult::ProcessAsMessage(text) => {
                    self.chat.set_input(text);
                    self.submit_input();
                }
                CommandResult::Quit => self.should_quit = true,
            },
            AppEvent::Recognition(event) => self.handle_recognition(event),
            AppEvent::CompletionFinished { pending, result } => {
                let message = self.chat.complete_submit(pending, result);
                self.log_transcript(&message);
                if let Some((text, from_voice)) = self.deferred_submit.take() {
                    debug!("sending transcript held back while loading");
                    self.submit_text(&text, from_voice);
                }
            }
            AppEvent::AutoSubmit { text, from_voice } => {
                if self.chat.is_loading() {
                    debug!(chars = text.len(), "reply pending; holding auto-submit");
                    self.deferred_submit = Some((text, from_voice));
                } else {
                    debug!(chars = text.len(), from_voice, "auto-submitting transcript");
                    self.submit_text(&text, from_voice);
                }
            }
            AppEvent::SpeakWelcome(text) => {
                self.chat.speech_output_mut().announce(&text, None);
            }
        }
    }

    fn handle_recognition(&mut self, event: RecognitionEvent) {
        match self.speech.handle_event(event) {
            SessionUpdate::Transcript => {
                let text = self.speech.session().accumulated_final_text.clone();
                self.chat.set_input(text);
            }
            SessionUpdate::Failed(err) => {
                self.recording = false;
                self.status = Some(err.to_string());
            }
            SessionUpdate::Listening | SessionUpdate::Restarted | SessionUpdate::Ignored => {}
        }
    }

    /// Submit the typed input buffer to the active persona.
    pub fn submit_input(&mut self) {
        if self.recording {
            self.cancel_recording();
        }

        let text = self.chat.input().to_string();
        self.submit_text(&text, false);
    }

    fn submit_text(&mut self, text: &str, from_voice: bool) {
        let persona = self.chat.active_persona();
        let Some(pending) = self.chat.begin_submit(persona, text, from_voice) else {
            return;
        };

        if let Some(message) = self.chat.messages(persona).last().cloned() {
            self.log_transcript(&message);
        }
        self.spawn_completion(pending);
    }

    fn spawn_completion(&self, pending: PendingSubmit) {
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = run_completion(client.as_ref(), &pending).await;
            if events
                .send(AppEvent::CompletionFinished { pending, result })
                .is_err()
            {
                debug!("app closed before completion finished");
            }
        });
    }

    fn send_after(&self, delay: Duration, event: AppEvent) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
    }

    pub fn select_persona(&mut self, persona: Persona) {
        if let Some(welcome) = self.chat.select_persona(persona) {
            if self.voice_output() {
                self.send_after(WELCOME_SPEECH_DELAY, AppEvent::SpeakWelcome(welcome));
            }
        }
    }

    pub fn select_language(&mut self, tag: &str) -> Result<(), String> {
        let Some(language) = find_language(tag) else {
            return Err(format!("Unknown language '{}'", tag.trim()));
        };
        info!(language = language.tag, "voice language selected");
        self.language = language.tag.to_string();
        self.speech.set_language(language.tag);
        if !keeps_output_language(language.tag) {
            self.chat.speech_output_mut().set_language(language.tag);
        }
        Ok(())
    }

    pub fn toggle_voice_input(&mut self) -> bool {
        self.voice_input = !self.voice_input;
        if self.recording {
            self.cancel_recording();
        }
        self.voice_input
    }

    pub fn toggle_voice_output(&mut self) -> bool {
        let enabled = !self.voice_output();
        self.chat.speech_output_mut().set_enabled(enabled);
        enabled
    }

    pub fn toggle_recording(&mut self) {
        if !self.voice_input {
            self.set_status("Voice input is off. Use /voice-in to turn it on.");
            return;
        }
        if self.chat.is_loading() {
            self.set_status("Waiting for a reply; try again when it arrives.");
            return;
        }

        if self.recording {
            self.stop_recording();
        } else {
            self.start_recording();
        }
    }

    fn start_recording(&mut self) {
        self.chat.clear_input();
        match self.speech.start(&self.language) {
            Ok(()) => {
                self.recording = true;
                self.set_status(format!("Listening ({})...", self.language));
            }
            Err(err) => {
                warn!(error = %err, "could not start recording");
                self.recording = false;
                self.status = Some(err.to_string());
            }
        }
    }

    fn stop_recording(&mut self) {
        self.recording = false;
        match self.speech.stop() {
            Some(transcript) => {
                self.set_status("Stopped listening; sending transcript.");
                self.send_after(
                    AUTO_SUBMIT_DELAY,
                    AppEvent::AutoSubmit {
                        text: transcript,
                        from_voice: true,
                    },
                );
            }
            None => self.set_status("Stopped listening."),
        }
    }

    /// Stop recording without submitting the transcript.
    fn cancel_recording(&mut self) {
        self.recording = false;
        self.speech.stop();
    }

    /// Re-speak message `index` (1-based) of the active persona, preferring
    /// its stored English rendering.
    pub fn speak_message(&mut self, index: usize) -> Result<(), String> {
        let message = index
            .checked_sub(1)
            .and_then(|i| self.chat.active_messages().get(i))
            .cloned()
            .ok_or_else(|| format!("No message #{index} in this conversation"))?;
        self.chat
            .speech_output_mut()
            .speak(&message.content, message.translated_content.as_deref());
        Ok(())
    }

    fn log_transcript(&mut self, message: &Message) {
        if let Err(err) = self.logging.log_transcript(message) {
            warn!(error = %err, "failed to write transcript log");
            self.status = Some(format!("Log error: {err}"));
        }
    }
}
