//! Registry of setting handlers.

use std::collections::HashMap;

use super::error::SettingError;
use super::handlers::{accept_any, BooleanHandler, TextHandler};
use super::SettingHandler;
use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::language::{find_language, DEFAULT_LANGUAGE};
use crate::core::persona::Persona;
use crate::core::speech::DEFAULT_SPEECH_COMMAND;
use crate::utils::url::normalize_base_url;

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
        };

        registry.register(Box::new(TextHandler {
            key: "default-persona",
            hint: "To set the startup mode, specify its id:",
            example: "guruchat set default-persona dsa",
            default_display: "default",
            set_field: |config, value| {
                config.default_persona = value.and_then(|id| id.parse().ok());
            },
            validate: validate_persona,
        }));
        registry.register(Box::new(TextHandler {
            key: "language",
            hint: "To set the voice language, specify a language tag:",
            example: "guruchat set language en-IN",
            default_display: DEFAULT_LANGUAGE,
            set_field: |config, value| config.language = value,
            validate: validate_language,
        }));
        registry.register(Box::new(BooleanHandler {
            key: "voice-output",
            hint: "To change spoken replies, specify on or off:",
            example: "guruchat set voice-output off",
            default_display: "on",
            set_field: |config, value| config.voice_output = value,
        }));
        registry.register(Box::new(BooleanHandler {
            key: "voice-input",
            hint: "To change voice input, specify on or off:",
            example: "guruchat set voice-input on",
            default_display: "off",
            set_field: |config, value| config.voice_input = value,
        }));
        registry.register(Box::new(TextHandler {
            key: "model",
            hint: "To set the model, specify its name:",
            example: "guruchat set model gemini-1.5-pro",
            default_display: DEFAULT_MODEL,
            set_field: |config, value| config.model = value,
            validate: accept_any,
        }));
        registry.register(Box::new(TextHandler {
            key: "base-url",
            hint: "To set the API base URL, specify it:",
            example: "guruchat set base-url https://generativelanguage.googleapis.com/v1beta",
            default_display: DEFAULT_BASE_URL,
            set_field: |config, value| config.base_url = value,
            validate: |input| Ok(normalize_base_url(input)),
        }));
        registry.register(Box::new(TextHandler {
            key: "speech-command",
            hint: "To set the speech program, specify its name or path (or none):",
            example: "guruchat set speech-command espeak",
            default_display: DEFAULT_SPEECH_COMMAND,
            set_field: |config, value| config.speech_command = value,
            validate: validate_speech_command,
        }));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    /// Resolve a key, accepting the TOML spelling (`voice_output`) too.
    pub fn lookup(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        let normalized = key.trim().to_ascii_lowercase().replace('_', "-");
        self.get(&normalized)
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_persona(input: &str) -> Result<String, SettingError> {
    input
        .parse::<Persona>()
        .map(|persona| persona.to_string())
        .map_err(|_| SettingError::UnknownItem {
            kind: "Mode",
            input: input.to_string(),
            hint: Some("Run 'guruchat modes' to list available modes.".to_string()),
        })
}

fn validate_language(input: &str) -> Result<String, SettingError> {
    find_language(input)
        .map(|language| language.tag.to_string())
        .ok_or_else(|| SettingError::UnknownItem {
            kind: "Language",
            input: input.to_string(),
            hint: Some("Run 'guruchat languages' to list supported languages.".to_string()),
        })
}

/// `none` or `off` stores an empty command, which selects the silent
/// synthesizer.
fn validate_speech_command(input: &str) -> Result<String, SettingError> {
    if input.eq_ignore_ascii_case("none") || input.eq_ignore_ascii_case("off") {
        Ok(String::new())
    } else {
        Ok(input.to_string())
    }
}
