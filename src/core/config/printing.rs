use crate::core::config::data::Config;

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

impl Config {
    /// Human-readable listing of every key with its effective value.
    pub fn describe(&self) -> Vec<String> {
        let unset_or = |value: &Option<String>, fallback: &str| match value {
            Some(value) if value.is_empty() => "none".to_string(),
            Some(value) => value.clone(),
            None => format!("{fallback} (default)"),
        };
        vec![
            format!(
                "  default-persona: {}",
                match self.default_persona {
                    Some(persona) => persona.to_string(),
                    None => format!("{} (default)", self.persona()),
                }
            ),
            format!("  language: {}", unset_or(&self.language, self.language())),
            format!(
                "  voice-output: {}{}",
                on_off(self.voice_output()),
                if self.voice_output.is_none() { " (default)" } else { "" }
            ),
            format!(
                "  voice-input: {}{}",
                on_off(self.voice_input()),
                if self.voice_input.is_none() { " (default)" } else { "" }
            ),
            format!("  model: {}", unset_or(&self.model, self.model())),
            format!("  base-url: {}", unset_or(&self.base_url, self.base_url())),
            format!(
                "  speech-command: {}",
                unset_or(&self.speech_command, self.speech_command())
            ),
        ]
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("{line}");
        }
    }
}
