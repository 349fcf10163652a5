use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub usages: &'static [CommandUsage],
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    /// First whitespace-separated argument, if any.
    pub fn first_arg(&self) -> Option<&'a str> {
        self.args.split_whitespace().next()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usages: &[CommandUsage {
            syntax: "/help",
            description: "Show available commands and usage information.",
        }],
        handler: super::handle_help,
    },
    Command {
        name: "mode",
        usages: &[
            CommandUsage {
                syntax: "/mode",
                description: "List modes and show the active one.",
            },
            CommandUsage {
                syntax: "/mode <id>",
                description: "Switch to a mode (default, dsa, upsc, love, gym).",
            },
        ],
        handler: super::handle_mode,
    },
    Command {
        name: "voice-in",
        usages: &[CommandUsage {
            syntax: "/voice-in",
            description: "Toggle voice input.",
        }],
        handler: super::handle_voice_in,
    },
    Command {
        name: "voice-out",
        usages: &[CommandUsage {
            syntax: "/voice-out",
            description: "Toggle spoken replies.",
        }],
        handler: super::handle_voice_out,
    },
    Command {
        name: "lang",
        usages: &[
            CommandUsage {
                syntax: "/lang",
                description: "List voice languages.",
            },
            CommandUsage {
                syntax: "/lang <tag>",
                description: "Set the voice language, e.g. en-IN.",
            },
        ],
        handler: super::handle_lang,
    },
    Command {
        name: "record",
        usages: &[CommandUsage {
            syntax: "/record",
            description: "Start listening, or stop and send what was heard.",
        }],
        handler: super::handle_record,
    },
    Command {
        name: "speak",
        usages: &[CommandUsage {
            syntax: "/speak <n>",
            description: "Read message number n of this conversation aloud.",
        }],
        handler: super::handle_speak,
    },
    Command {
        name: "log",
        usages: &[
            CommandUsage {
                syntax: "/log",
                description: "Pause or resume transcript logging.",
            },
            CommandUsage {
                syntax: "/log <file>",
                description: "Append the transcript to a file.",
            },
        ],
        handler: super::handle_log,
    },
    Command {
        name: "dump",
        usages: &[CommandUsage {
            syntax: "/dump [file]",
            description: "Write this conversation to a file.",
        }],
        handler: super::handle_dump,
    },
    Command {
        name: "quit",
        usages: &[CommandUsage {
            syntax: "/quit",
            description: "Leave the chat.",
        }],
        handler: super::handle_quit,
    },
];
