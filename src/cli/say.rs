//! Non-interactive "say" command

use std::error::Error;

use crate::api::CompletionClient;
use crate::cli::chat::{build_client, ChatOptions};
use crate::core::message::Message;
use crate::core::orchestrator::{run_completion, ChatOrchestrator};
use crate::core::persona::Persona;
use crate::core::speech::{SilentSynthesizer, SpeechOutput};
use crate::utils::logging::LoggingState;

/// Send one prompt to the selected persona and print the reply. Output is
/// text only.
pub async fn run_say(prompt: Vec<String>, options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: guruchat say <prompt>");
        std::process::exit(1);
    }

    let client = build_client(&options);
    let logging = LoggingState::new(options.log_file.clone())?;

    let Some(exchange) = exchange(&client, options.persona, &prompt, &logging).await? else {
        return Ok(());
    };
    println!("{}", exchange.reply.content);
    if let Some(err) = exchange.error {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

pub struct Exchange {
    /// The reply, or the fallback text when the call failed.
    pub reply: Message,
    pub error: Option<String>,
}

/// One submit/complete cycle, logging both turns.
pub async fn exchange(
    client: &dyn CompletionClient,
    persona: Persona,
    prompt: &str,
    logging: &LoggingState,
) -> Result<Option<Exchange>, Box<dyn Error>> {
    let output = SpeechOutput::new(Box::new(SilentSynthesizer), false);
    let mut chat = ChatOrchestrator::new(persona, output);

    let Some(pending) = chat.begin_submit(persona, prompt, false) else {
        return Ok(None);
    };
    if let Some(message) = chat.messages(persona).last() {
        logging.log_transcript(message)?;
    }

    let outcome = run_completion(client, &pending).await;
    let error = outcome.as_ref().err().map(ToString::to_string);
    let reply = chat.complete_submit(pending, outcome);
    logging.log_transcript(&reply)?;
    Ok(Some(Exchange { reply, error }))
}
