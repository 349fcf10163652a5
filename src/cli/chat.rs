//! Line-oriented interactive chat.
//!
//! Reads lines from stdin and prints transcript updates as they land. All
//! state changes go through [`App::handle_event`].

use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{CompletionClient, GeminiClient};
use crate::auth::AuthManager;
use crate::core::app::{App, AppEvent, AppInitConfig};
use crate::core::message::Message;
use crate::core::persona::Persona;
use crate::core::speech::{
    CommandSynthesizer, SilentSynthesizer, SpeechSynthesizer, UnavailableRecognitionHost,
};
use crate::utils::logging::{LoggingState, USER_PREFIX};

/// Effective settings for a chat or one-shot session.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub model: String,
    pub log_file: Option<String>,
    pub persona: Persona,
    pub language: String,
    pub voice_output: bool,
    pub voice_input: bool,
    pub base_url: String,
    pub speech_command: String,
}

/// Resolve the API key and build the Gemini client, exiting with a
/// message when no key is available.
pub fn build_client(options: &ChatOptions) -> GeminiClient {
    let auth_manager = AuthManager::new();
    let resolved = match auth_manager.resolve_api_key() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    debug!(source = ?resolved.source, "resolved API key");

    GeminiClient::new(resolved.key)
        .with_base_url(options.base_url.clone())
        .with_model(options.model.clone())
}

pub fn build_synthesizer(command: &str) -> Box<dyn SpeechSynthesizer> {
    let command = command.trim();
    if command.is_empty() {
        Box::new(SilentSynthesizer)
    } else {
        Box::new(CommandSynthesizer::new(command))
    }
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let client: Arc<dyn CompletionClient> = Arc::new(build_client(&options));
    let logging = match LoggingState::new(options.log_file.clone()) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            std::process::exit(1);
        }
    };

    let init = AppInitConfig {
        persona: options.persona,
        language: options.language.clone(),
        voice_input: options.voice_input,
        voice_output: options.voice_output,
    };
    let (mut app, mut events) = App::new(
        init,
        client,
        Box::new(UnavailableRecognitionHost),
        build_synthesizer(&options.speech_command),
        logging,
    );

    eprintln!("🚀 Starting guruchat");
    eprintln!("📡 Using model: {}", options.model);
    eprintln!("💡 Type /help for commands, /quit or Ctrl+C to leave");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    app.open();
    let mut view = TranscriptView::default();
    let mut stdout = io::stdout();
    view.render(&mut app, &mut stdout)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => match line? {
                Some(line) => app.handle_event(AppEvent::Input(line)),
                None => break,
            },
            Some(event) = events.recv() => app.handle_event(event),
            Some(event) = app.next_recognition_event() => {
                app.handle_event(AppEvent::Recognition(event));
            }
        }

        if app.should_quit() {
            break;
        }
        view.render(&mut app, &mut stdout)?;
    }

    info!("chat session ended");
    println!();
    Ok(())
}

/// Tracks what has already been printed so each pass only emits new lines.
#[derive(Debug, Default)]
pub struct TranscriptView {
    persona: Option<Persona>,
    shown: usize,
    was_loading: bool,
    live: Option<String>,
}

impl TranscriptView {
    pub fn render<W: Write>(&mut self, app: &mut App, out: &mut W) -> io::Result<()> {
        let persona = app.active_persona();
        if self.persona != Some(persona) {
            let profile = persona.profile();
            writeln!(out)?;
            writeln!(out, "── {} ──", profile.title)?;
            writeln!(out, "   {}", persona.input_hint())?;
            self.persona = Some(persona);
            self.shown = 0;
        }

        let messages = app.active_messages();
        for (offset, message) in messages.iter().enumerate().skip(self.shown) {
            write_message(out, offset + 1, persona, message)?;
        }
        self.shown = messages.len();

        let loading = app.chat().is_loading();
        if loading && !self.was_loading {
            writeln!(out, "   …thinking")?;
        }
        self.was_loading = loading;

        let live = live_transcript(app);
        if live.is_some() && live != self.live {
            if let Some(line) = &live {
                writeln!(out, "🎤 {line}")?;
            }
        }
        self.live = live;

        if let Some(status) = app.take_status() {
            writeln!(out, "ℹ️  {status}")?;
        }
        out.flush()
    }
}

/// Recognized text so far, with the engine's interim guess in brackets.
fn live_transcript(app: &App) -> Option<String> {
    if !app.is_recording() {
        return None;
    }
    let session = app.speech().session();
    let heard = session.accumulated_final_text.trim();
    let guess = session.pending_interim_text.trim();
    let line = match (heard.is_empty(), guess.is_empty()) {
        (true, true) if session.is_listening => "Listening…".to_string(),
        (true, true) => "Starting microphone…".to_string(),
        (false, true) => heard.to_string(),
        (true, false) => format!("[{guess}]"),
        (false, false) => format!("{heard} [{guess}]"),
    };
    Some(line)
}

fn write_message<W: Write>(
    out: &mut W,
    number: usize,
    persona: Persona,
    message: &Message,
) -> io::Result<()> {
    let label = if message.is_user() {
        if message.from_voice {
            format!("{USER_PREFIX} 🎤")
        } else {
            USER_PREFIX.to_string()
        }
    } else {
        persona.profile().title.clone()
    };

    let mut content = message.content.lines();
    let first = content.next().unwrap_or_default();
    writeln!(out, "[{number}] {label}: {first}")?;
    for line in content {
        writeln!(out, "    {line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::create_test_app;

    fn render(view: &mut TranscriptView, app: &mut App) -> String {
        let mut out = Vec::new();
        view.render(app, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn renders_only_new_messages() {
        let mut harness = create_test_app(false);
        harness.app.open();
        let mut view = TranscriptView::default();

        let first = render(&mut view, &mut harness.app);
        assert!(first.contains("── "));
        assert!(first.contains("[1] "));
        assert!(first.contains("Welcome to"));

        assert_eq!(render(&mut view, &mut harness.app), "");

        harness.client.push_ok("Two.");
        harness.app.handle_event(AppEvent::Input("one plus one".into()));
        let pending = render(&mut view, &mut harness.app);
        assert!(pending.contains("[2] You: one plus one"));
        assert!(pending.contains("…thinking"));
    }

    #[tokio::test]
    async fn switching_persona_reprints_its_history() {
        let mut harness = create_test_app(false);
        harness.app.open();
        let mut view = TranscriptView::default();
        render(&mut view, &mut harness.app);

        harness.app.handle_event(AppEvent::Input("/mode gym".into()));
        let output = render(&mut view, &mut harness.app);
        assert!(output.contains(&Persona::Gym.profile().title));
        assert!(output.contains("[1] "));
        assert!(output.contains("ℹ️  Mode set:"));
    }

    #[tokio::test]
    async fn live_transcript_shows_interim_guess_while_recording() {
        use crate::core::speech::{RecognitionEvent, RecognitionResult};

        let mut harness = create_test_app(false);
        let mut view = TranscriptView::default();
        render(&mut view, &mut harness.app);

        harness.app.toggle_recording();
        let started = render(&mut view, &mut harness.app);
        assert!(started.contains("🎤 Starting microphone…"));

        harness.host.emit(RecognitionEvent::Results(vec![
            RecognitionResult::final_text("binary"),
            RecognitionResult::interim("sear"),
        ]));
        while let Ok(Some(event)) = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            harness.app.next_recognition_event(),
        )
        .await
        {
            harness.app.handle_event(AppEvent::Recognition(event));
        }
        let heard = render(&mut view, &mut harness.app);
        assert!(heard.contains("🎤 binary [sear]"));
        assert_eq!(render(&mut view, &mut harness.app), "");

        harness.app.toggle_recording();
        let stopped = render(&mut view, &mut harness.app);
        assert!(!stopped.contains("🎤"));
    }

    #[test]
    fn multiline_messages_are_indented() {
        let mut out = Vec::new();
        let message = Message::assistant("line one\nline two");
        write_message(&mut out, 3, Persona::Dsa, &message).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[3] "));
        assert!(text.ends_with("line one\n    line two\n"));
    }
}
