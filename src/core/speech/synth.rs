//! Terminal-host synthesizers.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::output::{SpeechSynthesizer, Utterance};
use crate::core::language::primary_subtag;

pub const DEFAULT_SPEECH_COMMAND: &str = "espeak-ng";

/// espeak's default speed in words per minute and pitch on its 0..=99 scale;
/// utterance rate and pitch are applied as multipliers.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
const BASE_PITCH: f32 = 50.0;

/// Speaks by spawning an espeak-compatible program per utterance.
///
/// The child is killed on cancel, and on drop.
pub struct CommandSynthesizer {
    program: String,
    current: Option<Child>,
    missing: bool,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: None,
            missing: false,
        }
    }

    fn arguments(utterance: &Utterance) -> Vec<String> {
        let voice = primary_subtag(&utterance.language).to_ascii_lowercase();
        let speed = (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32;
        let pitch = (BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32;
        vec![
            "-v".into(),
            voice,
            "-s".into(),
            speed.to_string(),
            "-p".into(),
            pitch.to_string(),
            "--".into(),
            utterance.text.clone(),
        ]
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(&mut self, utterance: Utterance) {
        if self.missing {
            return;
        }
        let spawned = Command::new(&self.program)
            .args(Self::arguments(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(program = %self.program, "speech command not found; voice output muted");
                self.missing = true;
            }
            Err(err) => warn!(program = %self.program, error = %err, "failed to spawn speech command"),
        }
    }

    fn cancel_all(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Err(err) = child.start_kill() {
                debug!(error = %err, "speech process already finished");
            }
        }
    }
}

/// Synthesizer that only logs; used when no speech command is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn speak(&mut self, utterance: Utterance) {
        debug!(text = %utterance.text, "speech output (silent)");
    }

    fn cancel_all(&mut self) {}
}
