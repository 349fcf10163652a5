use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Appended to the system instruction of personas that set
/// `suppress_source_script`.
pub const SUPPRESS_SOURCE_SCRIPT_INSTRUCTION: &str =
    "Stop saying Hindi phrases at the end of your replies.";

/// A conversational mode with its own system instruction and message history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Default,
    Dsa,
    Upsc,
    Love,
    Gym,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::Default,
        Persona::Dsa,
        Persona::Upsc,
        Persona::Love,
        Persona::Gym,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Persona::Default => "default",
            Persona::Dsa => "dsa",
            Persona::Upsc => "upsc",
            Persona::Love => "love",
            Persona::Gym => "gym",
        }
    }

    pub fn profile(self) -> &'static PersonaProfile {
        builtin_profiles()
            .iter()
            .find(|profile| profile.id == self)
            .expect("builtins/personas.toml covers every persona")
    }

    /// Full system instruction sent with every request in this mode.
    pub fn system_instruction(self) -> String {
        let profile = self.profile();
        let instruction = profile.instruction.trim();
        if profile.suppress_source_script {
            format!("{instruction} {SUPPRESS_SOURCE_SCRIPT_INSTRUCTION}")
        } else {
            instruction.to_string()
        }
    }

    pub fn welcome_message(self) -> String {
        format!(
            "Welcome to {}! How can I help you today?",
            self.profile().title
        )
    }

    /// Placeholder shown in an empty input field.
    pub fn input_hint(self) -> String {
        match self {
            Persona::Default => "Ask anything...".to_string(),
            other => format!("Ask {} related questions...", other.profile().topic),
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Persona::ALL
            .into_iter()
            .find(|persona| persona.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                let available: Vec<&str> = Persona::ALL.iter().map(|p| p.id()).collect();
                format!(
                    "Mode '{}' not found. Available modes: {}",
                    needle,
                    available.join(", ")
                )
            })
    }
}

/// Static per-persona data loaded from the embedded persona table.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaProfile {
    pub id: Persona,
    pub title: String,
    pub topic: String,
    pub instruction: String,
    #[serde(default)]
    pub suppress_source_script: bool,
}

#[derive(Debug, Deserialize)]
struct PersonaTable {
    personas: Vec<PersonaProfile>,
}

fn load_builtin_profiles() -> Vec<PersonaProfile> {
    const TABLE: &str = include_str!("../builtins/personas.toml");
    let table: PersonaTable =
        toml::from_str(TABLE).expect("Failed to parse builtins/personas.toml");
    table.personas
}

pub fn builtin_profiles() -> &'static [PersonaProfile] {
    static PROFILES: OnceLock<Vec<PersonaProfile>> = OnceLock::new();
    PROFILES.get_or_init(load_builtin_profiles)
}

/// Holds the active persona.
#[derive(Debug, Default, Clone)]
pub struct ModeStore {
    active: Persona,
}

impl ModeStore {
    pub fn new(initial: Persona) -> Self {
        Self { active: initial }
    }

    pub fn get(&self) -> Persona {
        self.active
    }

    /// Returns true when the active persona changed.
    pub fn set(&mut self, persona: Persona) -> bool {
        let changed = self.active != persona;
        self.active = persona;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_persona_exactly_once() {
        let profiles = builtin_profiles();
        assert_eq!(profiles.len(), Persona::ALL.len());
        for persona in Persona::ALL {
            let count = profiles.iter().filter(|p| p.id == persona).count();
            assert_eq!(count, 1, "persona {persona} appears {count} times");
        }
    }

    #[test]
    fn suppress_instruction_applies_to_every_mode_but_default() {
        assert!(!Persona::Default
            .system_instruction()
            .contains(SUPPRESS_SOURCE_SCRIPT_INSTRUCTION));
        for persona in [Persona::Dsa, Persona::Upsc, Persona::Love, Persona::Gym] {
            let instruction = persona.system_instruction();
            assert!(
                instruction.ends_with(SUPPRESS_SOURCE_SCRIPT_INSTRUCTION),
                "{persona}: {instruction}"
            );
        }
    }

    #[test]
    fn default_instruction_mentions_accent_phrases() {
        let instruction = Persona::Default.system_instruction();
        assert!(instruction.contains("chamak raha hai"));
        assert!(instruction.starts_with("You are a helpful AI assistant"));
    }

    #[test]
    fn welcome_messages_use_titles() {
        assert_eq!(
            Persona::Default.welcome_message(),
            "Welcome to DSA Guru AI! How can I help you today?"
        );
        assert_eq!(
            Persona::Upsc.welcome_message(),
            "Welcome to UPSC Mode! How can I help you today?"
        );
    }

    #[test]
    fn parse_is_case_insensitive_and_lists_modes_on_error() {
        assert_eq!("GYM".parse::<Persona>(), Ok(Persona::Gym));
        assert_eq!(" love ".parse::<Persona>(), Ok(Persona::Love));

        let err = "chess".parse::<Persona>().unwrap_err();
        assert!(err.contains("Mode 'chess' not found"));
        assert!(err.contains("default, dsa, upsc, love, gym"));
    }

    #[test]
    fn input_hint_matches_mode() {
        assert_eq!(Persona::Default.input_hint(), "Ask anything...");
        assert_eq!(Persona::Dsa.input_hint(), "Ask dsa related questions...");
    }

    #[test]
    fn mode_store_reports_changes() {
        let mut store = ModeStore::default();
        assert_eq!(store.get(), Persona::Default);
        assert!(store.set(Persona::Dsa));
        assert!(!store.set(Persona::Dsa));
        assert_eq!(store.get(), Persona::Dsa);
    }
}
