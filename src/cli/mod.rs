//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod say;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::auth::AuthManager;
use crate::cli::chat::{run_chat, ChatOptions};
use crate::cli::say::run_say;
use crate::cli::settings::{run_set, run_unset};
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::language::{find_language, DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
use crate::core::persona::Persona;

/// Environment variable holding the tracing filter directive.
pub const LOG_FILTER_ENV: &str = "GURUCHAT_LOG";

#[derive(Parser)]
#[command(name = "guruchat")]
#[command(about = "A persona-based Gemini chat client with speech input and output")]
#[command(
    long_about = "Guruchat talks to Google's Gemini models through one of five personas \
(general assistant, DSA tutor, UPSC mentor, relationship advisor, gym coach). \
Each persona keeps its own conversation, and replies can be spoken aloud.\n\n\
Authentication:\n\
  Use 'guruchat auth' to store a Gemini API key in your system keyring.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY                  Your Gemini API key\n\
  GOOGLE_GENERATIVE_AI_API_KEY    Alternative name for the key\n\
  GURUCHAT_LOG                    Diagnostic log filter (e.g. debug)\n\n\
Commands:\n\
  /help             List chat commands\n\
  /mode <id>        Switch persona\n\
  /record           Start or stop voice recording\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Gemini model to use
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Persona to start in (default, dsa, upsc, love, gym)
    #[arg(long = "mode", global = true, value_name = "MODE")]
    pub persona: Option<String>,

    /// Voice language tag, e.g. en-IN
    #[arg(long = "lang", global = true, value_name = "TAG")]
    pub language: Option<String>,

    /// Do not speak replies
    #[arg(long, global = true)]
    pub mute: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a Gemini API key in the system keyring
    Auth,
    /// Remove the stored Gemini API key
    Deauth,
    /// Start the chat interface (default)
    Chat,
    /// Send one prompt and print the reply
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values, or show them all when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// List available modes
    Modes,
    /// List supported voice languages
    Languages,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

/// Diagnostics go to stderr so they never interleave with the transcript.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Auth => {
            let auth_manager = AuthManager::new();
            if let Err(e) = auth_manager.interactive_auth() {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            let auth_manager = AuthManager::new();
            if let Err(e) = auth_manager.interactive_deauth() {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            if let Err(e) = run_set(key, value) {
                e.print();
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Unset { key } => {
            if let Err(e) = run_unset(key) {
                e.print();
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Modes => {
            list_modes();
            Ok(())
        }
        Commands::Languages => {
            list_languages();
            Ok(())
        }
        Commands::Say { prompt } => {
            let options = chat_options(&args.model, &args.log, &args.persona, &args.language, args.mute)?;
            run_say(prompt, options).await
        }
        Commands::Chat => {
            let options = chat_options(&args.model, &args.log, &args.persona, &args.language, args.mute)?;
            run_chat(options).await
        }
    }
}

/// Merge command-line flags over the saved configuration.
fn chat_options(
    model: &Option<String>,
    log: &Option<String>,
    persona: &Option<String>,
    language: &Option<String>,
    mute: bool,
) -> Result<ChatOptions, Box<dyn Error>> {
    let config = Config::load()?;
    let persona = match persona {
        Some(id) => match id.parse::<Persona>() {
            Ok(persona) => persona,
            Err(message) => {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
        },
        None => config.persona(),
    };
    let language = match resolve_language(language.as_deref(), &config) {
        Ok(tag) => tag,
        Err(message) => {
            eprintln!("❌ {message}");
            std::process::exit(1);
        }
    };

    Ok(ChatOptions {
        model: model.clone().unwrap_or_else(|| config.model().to_string()),
        log_file: log.clone(),
        persona,
        language,
        voice_output: !mute && config.voice_output(),
        voice_input: config.voice_input(),
        base_url: config.base_url().to_string(),
        speech_command: config.speech_command().to_string(),
    })
}

/// Pick the voice language tag. An unknown `--lang` is an error; an unknown
/// saved tag falls back to the default.
fn resolve_language(flag: Option<&str>, config: &Config) -> Result<String, String> {
    if let Some(tag) = flag {
        return find_language(tag)
            .map(|language| language.tag.to_string())
            .ok_or_else(|| {
                format!("Unknown language '{tag}'. Run 'guruchat languages' for the list.")
            });
    }
    let saved = config.language();
    match find_language(saved) {
        Some(language) => Ok(language.tag.to_string()),
        None => {
            warn!(language = saved, "ignoring unsupported saved language");
            eprintln!("⚠️  Saved language '{saved}' is not supported; using {DEFAULT_LANGUAGE}.");
            Ok(DEFAULT_LANGUAGE.to_string())
        }
    }
}

fn list_modes() {
    let config = Config::load().unwrap_or_default();
    let active = config.persona();
    println!("Available modes:");
    for persona in Persona::ALL {
        let marker = if persona == active { "*" } else { " " };
        println!("{marker} {:<8} {}", persona.id(), persona.profile().title);
    }
    if let Ok(path) = Config::get_config_path() {
        println!();
        println!("Startup mode is set in {}", path_display(path));
    }
}

fn list_languages() {
    println!("Supported voice languages:");
    for language in SUPPORTED_LANGUAGES {
        println!("  {:<6} {}", language.tag, language.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_language_is_canonicalized_or_rejected() {
        let config = Config::default();
        assert_eq!(resolve_language(Some("en-in"), &config).unwrap(), "en-IN");
        assert!(resolve_language(Some("tlh"), &config)
            .unwrap_err()
            .contains("Unknown language 'tlh'"));
    }

    #[test]
    fn unsupported_saved_language_falls_back_to_default() {
        let config = Config {
            language: Some("xx-YY".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_language(None, &config).unwrap(), DEFAULT_LANGUAGE);

        let config = Config {
            language: Some("hi-in".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_language(None, &config).unwrap(), "hi-IN");
    }

    #[test]
    fn chat_is_the_default_command() {
        let args = Args::try_parse_from(["guruchat"]).unwrap();
        assert!(args.command.is_none());
        assert!(!args.mute);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let args = Args::try_parse_from([
            "guruchat", "chat", "--mode", "gym", "--lang", "fr-FR", "--mute", "-m", "gemini-1.5-pro",
        ])
        .unwrap();
        assert!(matches!(args.command, Some(Commands::Chat)));
        assert_eq!(args.persona.as_deref(), Some("gym"));
        assert_eq!(args.language.as_deref(), Some("fr-FR"));
        assert_eq!(args.model.as_deref(), Some("gemini-1.5-pro"));
        assert!(args.mute);
    }

    #[test]
    fn say_collects_prompt_words() {
        let args = Args::try_parse_from(["guruchat", "say", "what", "is", "-a", "heap"]).unwrap();
        match args.command {
            Some(Commands::Say { prompt }) => assert_eq!(prompt, ["what", "is", "-a", "heap"]),
            _ => panic!("expected say"),
        }
    }

    #[test]
    fn set_without_key_lists() {
        let args = Args::try_parse_from(["guruchat", "set"]).unwrap();
        match args.command {
            Some(Commands::Set { key, value }) => {
                assert!(key.is_none());
                assert!(value.is_empty());
            }
            _ => panic!("expected set"),
        }
    }
}
