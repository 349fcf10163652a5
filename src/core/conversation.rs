use std::collections::HashMap;

use crate::api::CompletionTurn;
use crate::core::message::Message;
use crate::core::persona::Persona;

/// Per-persona, append-only message history.
///
/// Each persona owns an independent sequence; nothing here ever edits or
/// removes a message once it is appended.
#[derive(Debug, Default)]
pub struct ConversationStore {
    threads: HashMap<Persona, Vec<Message>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, persona: Persona, message: Message) {
        self.threads.entry(persona).or_default().push(message);
    }

    /// Append an assistant welcome message if the persona has no history yet.
    ///
    /// Returns true when the welcome was appended.
    pub fn ensure_welcome(&mut self, persona: Persona, welcome_text: &str) -> bool {
        let thread = self.threads.entry(persona).or_default();
        if !thread.is_empty() {
            return false;
        }
        thread.push(Message::assistant(welcome_text));
        true
    }

    pub fn get(&self, persona: Persona) -> &[Message] {
        self.threads
            .get(&persona)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self, persona: Persona) -> usize {
        self.get(persona).len()
    }

    pub fn is_empty(&self, persona: Persona) -> bool {
        self.get(persona).is_empty()
    }

    /// History of a persona as completion turns, oldest first.
    pub fn turns(&self, persona: Persona) -> Vec<CompletionTurn> {
        self.get(persona)
            .iter()
            .map(|message| CompletionTurn {
                role: message.role.to_turn_role(),
                text: message.content.clone(),
            })
            .collect()
    }
}
