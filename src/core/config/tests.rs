use super::data::{path_display, Config};
use super::io::ConfigError;
use crate::core::persona::Persona;
use std::fs;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.persona(), Persona::Default);
    assert_eq!(config.language(), "en-US");
    assert!(config.voice_output());
    assert!(!config.voice_input());
    assert_eq!(config.model(), "gemini-1.5-flash");
    assert_eq!(
        config.base_url(),
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(config.speech_command(), "espeak-ng");
}

#[test]
fn save_then_load_preserves_values() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        default_persona: Some(Persona::Gym),
        language: Some("hi-IN".into()),
        voice_output: Some(false),
        voice_input: Some(true),
        ..Config::default()
    };
    config.save_to_path(&config_path).expect("save failed");

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("default_persona = \"gym\""));
    assert!(!contents.contains("model"));

    let loaded = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(loaded, config);

    let cleared = Config {
        voice_output: None,
        ..loaded
    };
    cleared.save_to_path(&config_path).expect("second save failed");
    let reloaded = Config::load_from_path(&config_path).unwrap();
    assert!(reloaded.voice_output());
}

#[test]
fn parse_error_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "default_persona = \"chess\"\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    let message = err.to_string();
    assert!(message.starts_with("Failed to parse config at "));
    assert!(message.contains("config.toml"));
}

#[test]
fn read_error_is_reported_for_directories() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::load_from_path(temp_dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn describe_marks_defaults() {
    let config = Config {
        model: Some("gemini-2.0-flash".into()),
        ..Config::default()
    };
    let lines = config.describe();
    assert!(lines.contains(&"  model: gemini-2.0-flash".to_string()));
    assert!(lines.contains(&"  voice-output: on (default)".to_string()));
    assert!(lines.contains(&"  default-persona: default (default)".to_string()));
}

#[cfg(unix)]
#[test]
fn path_display_abbreviates_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config/guruchat/config.toml");
        assert_eq!(path_display(&path), "~/.config/guruchat/config.toml");
    }
}
