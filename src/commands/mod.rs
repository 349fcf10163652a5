mod registry;

pub use registry::{all_commands, Command, CommandInvocation, CommandUsage};

use std::path::Path;

use chrono::Utc;

use crate::core::app::App;
use crate::core::language::SUPPORTED_LANGUAGES;
use crate::core::persona::Persona;
use crate::utils::logging::dump_conversation;


#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, ' ');
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub fn help_text() -> String {
    let mut help = String::from("Commands:");
    for command in all_commands() {
        for usage in command.usages {
            help.push_str(&format!("\n  {:<14} {}", usage.syntax, usage.description));
        }
    }
    help.push_str("\nAnything else is sent to the active mode.");
    help
}

pub(super) fn handle_help(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.set_status(help_text());
    CommandResult::Continue
}

pub(super) fn handle_mode(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some(id) = invocation.first_arg() else {
        let active = app.active_persona();
        let listing: Vec<String> = Persona::ALL
            .iter()
            .map(|persona| {
                let marker = if *persona == active { "*" } else { " " };
                format!("{marker} {:<8} {}", persona.id(), persona.profile().title)
            })
            .collect();
        app.set_status(listing.join("\n"));
        return CommandResult::Continue;
    };

    match id.parse::<Persona>() {
        Ok(persona) => {
            app.select_persona(persona);
            app.set_status(format!("Mode set: {}", persona.profile().title));
        }
        Err(e) => app.set_status(e.to_string()),
    }
    CommandResult::Continue
}

pub(super) fn handle_voice_in(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let enabled = app.toggle_voice_input();
    app.set_status(format!(
        "Voice input {}",
        if enabled { "on" } else { "off" }
    ));
    CommandResult::Continue
}

pub(super) fn handle_voice_out(
    app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let enabled = app.toggle_voice_output();
    app.set_status(format!(
        "Voice output {}",
        if enabled { "on" } else { "off" }
    ));
    CommandResult::Continue
}

pub(super) fn handle_lang(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some(tag) = invocation.first_arg() else {
        let current = app.language().to_string();
        let listing: Vec<String> = SUPPORTED_LANGUAGES
            .iter()
            .map(|language| {
                let marker = if language.tag == current { "*" } else { " " };
                format!("{marker} {:<6} {}", language.tag, language.label)
            })
            .collect();
        app.set_status(listing.join("\n"));
        return CommandResult::Continue;
    };

    match app.select_language(tag) {
        Ok(()) => app.set_status(format!("Voice language: {}", app.language())),
        Err(e) => app.set_status(e),
    }
    CommandResult::Continue
}

pub(super) fn handle_record(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.toggle_recording();
    CommandResult::Continue
}

pub(super) fn handle_speak(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let index = invocation
        .first_arg()
        .and_then(|arg| arg.parse::<usize>().ok());
    match index {
        Some(index) => {
            if let Err(e) = app.speak_message(index) {
                app.set_status(e);
            }
        }
        None => app.set_status("Usage: /speak <message number>"),
    }
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();

    match parts.len() {
        1 => match app.logging.toggle_logging("Logging paused") {
            Ok(message) => app.set_status(message),
            Err(e) => app.set_status(format!("Log error: {e}")),
        },
        2 => match app.logging.set_log_file(parts[1].to_string()) {
            Ok(message) => app.set_status(message),
            Err(e) => app.set_status(format!("Logfile error: {e}")),
        },
        _ => app.set_status("Usage: /log [filename]"),
    }
    CommandResult::Continue
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let parts: Vec<&str> = invocation.input.split_whitespace().collect();
    let filename = match parts.len() {
        1 => {
            let timestamp = Utc::now().format("%Y-%m-%d");
            format!("guruchat-{}-{timestamp}.txt", app.active_persona().id())
        }
        2 => parts[1].to_string(),
        _ => {
            app.set_status("Usage: /dump [filename]");
            return CommandResult::Continue;
        }
    };

    match dump_active_conversation(app, &filename) {
        Ok(()) => app.set_status(format!("Dumped: {filename}")),
        Err(e) => app.set_status(format!("Dump error: {e}")),
    }
    CommandResult::Continue
}

fn dump_active_conversation(app: &App, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let messages = app.active_messages();
    if messages.is_empty() {
        return Err("No conversation to dump - the chat history is empty.".into());
    }
    if Path::new(filename).exists() {
        return Err(format!(
            "File '{filename}' already exists. Please specify a different filename with /dump <filename>."
        )
        .into());
    }
    dump_conversation(messages, app.active_persona().profile().title.as_str(), filename)
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}
