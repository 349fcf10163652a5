//! Plain-text transcript logging.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::core::message::{Message, TranscriptRole};

pub const USER_PREFIX: &str = "You";

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    /// A given path is checked for write access and logging starts active.
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };
        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }
        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: String) -> Result<String, Box<dyn std::error::Error>> {
        test_file_access(&path)?;

        self.file_path = Some(path.clone());
        self.is_active = true;

        Ok(format!("Logging enabled to: {path}"))
    }

    pub fn toggle_logging(
        &mut self,
        pause_message: &str,
    ) -> Result<String, Box<dyn std::error::Error>> {
        match self.file_path.clone() {
            Some(path) => {
                if self.is_active {
                    // Marker goes in before pausing, otherwise it is dropped.
                    self.log_message(&format!("## {pause_message}"))?;
                    self.is_active = false;
                    Ok(format!("Logging paused (file: {path})"))
                } else {
                    self.is_active = true;
                    Ok(format!("Logging resumed to: {path}"))
                }
            }
            None => {
                Err("No log file specified. Use /log <filename> to enable logging first.".into())
            }
        }
    }

    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        match (&self.file_path, self.is_active) {
            (Some(path), true) => append_block(path, content),
            _ => Ok(()),
        }
    }

    /// Log a chat message the same way `/dump` writes it.
    pub fn log_transcript(&self, message: &Message) -> Result<(), Box<dyn std::error::Error>> {
        self.log_message(&format_message(message))
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

}

fn format_message(message: &Message) -> String {
    match message.role {
        TranscriptRole::User => format!("{USER_PREFIX}: {}", message.content),
        TranscriptRole::Assistant => message.content.clone(),
    }
}

fn append_block(path: &str, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    for line in content.lines() {
        writeln!(writer, "{line}")?;
    }
    // Blank line between messages.
    writeln!(writer)?;

    writer.flush()?;
    Ok(())
}

/// Write a whole conversation to `path`, replacing any existing file only
/// once the new contents are complete.
pub fn dump_conversation(
    messages: &[Message],
    heading: &str,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let target_path = Path::new(path);
    let parent = match target_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent)?;
    writeln!(temp_file, "## {heading}")?;
    writeln!(temp_file)?;
    for message in messages {
        for line in format_message(message).lines() {
            writeln!(temp_file, "{line}")?;
        }
        writeln!(temp_file)?;
    }

    temp_file.flush()?;
    temp_file.as_file().sync_all()?;
    temp_file.persist(path)?;
    Ok(())
}

fn test_file_access(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.flush()?;
    Ok(())
}
