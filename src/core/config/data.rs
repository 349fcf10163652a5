use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::core::language::DEFAULT_LANGUAGE;
use crate::core::persona::Persona;
use crate::core::speech::DEFAULT_SPEECH_COMMAND;

/// User settings persisted as TOML. Every key is optional; accessors apply
/// the defaults.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Persona selected at startup.
    pub default_persona: Option<Persona>,
    /// Voice language tag, e.g. "en-IN".
    pub language: Option<String>,
    pub voice_output: Option<bool>,
    pub voice_input: Option<bool>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Program used to speak replies in the terminal.
    pub speech_command: Option<String>,
}

impl Config {
    pub fn persona(&self) -> Persona {
        self.default_persona.unwrap_or_default()
    }

    pub fn language(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    pub fn voice_output(&self) -> bool {
        self.voice_output.unwrap_or(true)
    }

    pub fn voice_input(&self) -> bool {
        self.voice_input.unwrap_or(false)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn speech_command(&self) -> &str {
        self.speech_command
            .as_deref()
            .unwrap_or(DEFAULT_SPEECH_COMMAND)
    }
}

pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
