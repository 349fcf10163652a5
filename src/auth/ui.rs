use std::io::{self, BufRead, Write};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationChoice {
    Yes,
    No,
    Cancel,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct UiError {
    message: String,
}

impl UiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<io::Error> for UiError {
    fn from(err: io::Error) -> Self {
        UiError::new(err.to_string())
    }
}

fn read_line(prompt: &str) -> Result<String, UiError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input)
}

pub fn prompt_api_key() -> Result<String, UiError> {
    println!("🔐 guruchat authentication setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Create a key at https://aistudio.google.com/app/apikey");
    println!();
    let key = read_line("Enter your Gemini API key: ")?;
    let key = key.trim();
    if key.is_empty() {
        return Err(UiError::new("API key cannot be empty"));
    }
    Ok(key.to_string())
}

pub fn prompt_confirmation(question: &str) -> Result<ConfirmationChoice, UiError> {
    let answer = read_line(&format!("{question} (y/N): "))?;
    parse_confirmation(&answer)
}

pub fn parse_confirmation(input: &str) -> Result<ConfirmationChoice, UiError> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Ok(ConfirmationChoice::No);
    }
    match trimmed.as_str() {
        "y" | "yes" => Ok(ConfirmationChoice::Yes),
        "n" | "no" => Ok(ConfirmationChoice::No),
        "c" | "cancel" => Ok(ConfirmationChoice::Cancel),
        _ => Err(UiError::new("Invalid confirmation response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_parsing_handles_empty_and_cancel() {
        assert_eq!(parse_confirmation("\n").unwrap(), ConfirmationChoice::No);
        assert_eq!(parse_confirmation(" YES ").unwrap(), ConfirmationChoice::Yes);
        assert_eq!(parse_confirmation("c").unwrap(), ConfirmationChoice::Cancel);
        assert!(parse_confirmation("maybe").is_err());
    }
}
