//! One send/receive cycle against the completion endpoint.
//!
//! Submission is split in two so the awaited call can run off the event loop:
//! [`ChatOrchestrator::begin_submit`] records the user turn and hands back a
//! [`PendingSubmit`]; [`run_completion`] performs the call(s);
//! [`ChatOrchestrator::complete_submit`] records the outcome.

use tracing::{debug, info, warn};

use crate::api::{CompletionClient, CompletionError, CompletionRequest};
use crate::core::conversation::ConversationStore;
use crate::core::message::Message;
use crate::core::persona::{ModeStore, Persona};
use crate::core::source_script::{contains_source_script, speech_rendering_request};
use crate::core::speech::SpeechOutput;

pub const FALLBACK_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

/// A submitted user turn waiting for its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub ticket: u64,
    /// Persona active at submit time; the reply lands here even if the user
    /// switches away before it arrives.
    pub persona: Persona,
    pub request: CompletionRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReply {
    pub text: String,
    /// English rendering used only for speech.
    pub speech_text: Option<String>,
}

pub struct ChatOrchestrator {
    modes: ModeStore,
    conversations: ConversationStore,
    speech: SpeechOutput,
    input: String,
    loading: bool,
    next_ticket: u64,
}

impl ChatOrchestrator {
    pub fn new(persona: Persona, speech: SpeechOutput) -> Self {
        Self {
            modes: ModeStore::new(persona),
            conversations: ConversationStore::new(),
            speech,
            input: String::new(),
            loading: false,
            next_ticket: 1,
        }
    }

    pub fn active_persona(&self) -> Persona {
        self.modes.get()
    }

    /// Make `persona` active and ensure its welcome message exists.
    ///
    /// Returns the welcome text when one was appended, so the caller can
    /// speak it.
    pub fn select_persona(&mut self, persona: Persona) -> Option<String> {
        if self.modes.set(persona) {
            info!(persona = %persona, "persona selected");
        }
        self.ensure_active_welcome()
    }

    pub fn ensure_active_welcome(&mut self) -> Option<String> {
        let persona = self.modes.get();
        let welcome = persona.welcome_message();
        self.conversations
            .ensure_welcome(persona, &welcome)
            .then_some(welcome)
    }

    pub fn messages(&self, persona: Persona) -> &[Message] {
        self.conversations.get(persona)
    }

    pub fn active_messages(&self) -> &[Message] {
        self.conversations.get(self.modes.get())
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn speech_output(&self) -> &SpeechOutput {
        &self.speech
    }

    pub fn speech_output_mut(&mut self) -> &mut SpeechOutput {
        &mut self.speech
    }

    /// Record the user turn and build the request. `None` for blank text.
    pub fn begin_submit(
        &mut self,
        persona: Persona,
        text: &str,
        from_voice: bool,
    ) -> Option<PendingSubmit> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.conversations
            .append(persona, Message::user(text, from_voice));
        self.input.clear();
        self.loading = true;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        debug!(ticket, persona = %persona, from_voice, "submitting user turn");

        let request = CompletionRequest::new(
            self.conversations.turns(persona),
            Some(persona.system_instruction()),
        );
        Some(PendingSubmit {
            ticket,
            persona,
            request,
        })
    }

    /// Record the outcome of a pending submission and return the appended
    /// assistant message.
    pub fn complete_submit(
        &mut self,
        pending: PendingSubmit,
        outcome: Result<CompletionReply, CompletionError>,
    ) -> Message {
        let message = match outcome {
            Ok(reply) => {
                debug!(ticket = pending.ticket, "completion succeeded");
                self.speech
                    .announce(&reply.text, reply.speech_text.as_deref());
                Message::assistant_with_translation(reply.text, reply.speech_text)
            }
            Err(err) => {
                warn!(ticket = pending.ticket, error = %err, "completion failed");
                self.speech.announce(FALLBACK_REPLY, Some(FALLBACK_REPLY));
                Message::assistant(FALLBACK_REPLY)
            }
        };

        self.conversations.append(pending.persona, message.clone());
        self.loading = false;
        message
    }

    /// Full cycle for callers that can await in place.
    pub async fn submit(
        &mut self,
        client: &dyn CompletionClient,
        persona: Persona,
        text: &str,
        from_voice: bool,
    ) -> Option<Message> {
        let pending = self.begin_submit(persona, text, from_voice)?;
        let outcome = run_completion(client, &pending).await;
        Some(self.complete_submit(pending, outcome))
    }
}

/// Perform the completion call for `pending`. Replies of the default persona
/// that carry Hindi get a second call for an English speech rendering; a
/// failed rendering call only costs the rendering.
pub async fn run_completion(
    client: &dyn CompletionClient,
    pending: &PendingSubmit,
) -> Result<CompletionReply, CompletionError> {
    let text = client.complete(pending.request.clone()).await?;

    let speech_text = if pending.persona == Persona::Default && contains_source_script(&text) {
        match client.complete(speech_rendering_request(&text)).await {
            Ok(rendering) => Some(rendering),
            Err(err) => {
                warn!(ticket = pending.ticket, error = %err, "speech rendering request failed");
                None
            }
        }
    } else {
        None
    };

    Ok(CompletionReply { text, speech_text })
}
