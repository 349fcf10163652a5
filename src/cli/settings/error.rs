//! Error types for settings operations.

use thiserror::Error;

/// Errors that can occur when modifying configuration settings.
#[derive(Debug, Error)]
pub enum SettingError {
    #[error("Unknown config key: {0}")]
    UnknownKey(String),
    #[error("{kind} '{input}' not found")]
    UnknownItem {
        kind: &'static str,
        input: String,
        hint: Option<String>,
    },
    #[error("Invalid boolean value: {0}")]
    InvalidBoolean(String),
    #[error("{hint}")]
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    #[error("Config error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownItem { hint, .. } => {
                eprintln!("❌ {self}.");
                if let Some(hint) = hint {
                    eprintln!("   {hint}");
                }
            }
            SettingError::InvalidBoolean(_) => {
                eprintln!("❌ {self}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::UnknownKey(_) | SettingError::Config(_) => eprintln!("❌ {self}"),
        }
    }
}
