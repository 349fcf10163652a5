//! Speech output: newest utterance wins.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::language::DEFAULT_LANGUAGE;

pub const SPEECH_RATE: f32 = 0.9;
pub const SPEECH_PITCH: f32 = 1.0;

/// Stand-in for quoted or bracketed spans the synthesizer would mangle.
pub const SPEECH_PLACEHOLDER: &str = "[Hindi phrase]";

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub language: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Host text-to-speech engine.
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, utterance: Utterance);
    /// Cancel the current utterance and anything queued behind it.
    fn cancel_all(&mut self);
}

fn quoted_span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""[^"]*"|“[^”]*”|'[^']*'|‘[^’]*’|\([^)]*\)|「[^」]*」"#)
            .expect("quoted span pattern is valid")
    })
}

/// Replace every quoted, parenthesised or 「」 bracketed span with
/// [`SPEECH_PLACEHOLDER`].
///
/// ```
/// use guruchat::core::speech::derive_speech_safe_text;
///
/// assert_eq!(
///     derive_speech_safe_text("Concept \"chamak raha hai\" is great"),
///     "Concept [Hindi phrase] is great"
/// );
/// ```
pub fn derive_speech_safe_text(text: &str) -> String {
    quoted_span_pattern()
        .replace_all(text, SPEECH_PLACEHOLDER)
        .into_owned()
}

pub struct SpeechOutput {
    synthesizer: Box<dyn SpeechSynthesizer>,
    language: String,
    enabled: bool,
}

impl SpeechOutput {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, enabled: bool) -> Self {
        Self {
            synthesizer,
            language: DEFAULT_LANGUAGE.to_string(),
            enabled,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.synthesizer.cancel_all();
        }
    }

    /// Speak regardless of the enabled flag. A preferred rendering, when
    /// present, is spoken verbatim; otherwise quoted spans are masked.
    pub fn speak(&mut self, text: &str, preferred: Option<&str>) {
        self.synthesizer.cancel_all();
        let text = match preferred {
            Some(rendering) => rendering.to_string(),
            None => derive_speech_safe_text(text),
        };
        debug!(chars = text.len(), language = %self.language, "speaking utterance");
        self.synthesizer.speak(Utterance {
            text,
            language: self.language.clone(),
            rate: SPEECH_RATE,
            pitch: SPEECH_PITCH,
        });
    }

    /// Speak only while voice output is on.
    pub fn announce(&mut self, text: &str, preferred: Option<&str>) -> bool {
        if !self.enabled {
            return false;
        }
        self.speak(text, preferred);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{RecordingSynthesizer, SynthCall};

    #[test]
    fn masks_each_quote_style() {
        let cases = [
            ("Concept \"chamak raha hai\" is great", "Concept [Hindi phrase] is great"),
            ("say 'haanji' now", "say [Hindi phrase] now"),
            ("a “curly” b", "a [Hindi phrase] b"),
            ("a ‘single’ b", "a [Hindi phrase] b"),
            ("heap (बढ़िया) sort", "heap [Hindi phrase] sort"),
            ("「swaad」 aa gya", "[Hindi phrase] aa gya"),
            ("no quotes here", "no quotes here"),
        ];
        for (input, expected) in cases {
            assert_eq!(derive_speech_safe_text(input), expected, "input: {input}");
        }
    }

    #[test]
    fn masks_multiple_spans() {
        assert_eq!(
            derive_speech_safe_text("\"one\" and (two)"),
            "[Hindi phrase] and [Hindi phrase]"
        );
    }

    #[test]
    fn speak_cancels_before_each_utterance() {
        let synth = RecordingSynthesizer::new();
        let mut output = SpeechOutput::new(Box::new(synth.clone()), true).with_language("en-IN");

        output.speak("first \"x\"", None);
        output.speak("second", Some("rendered"));

        let calls = synth.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], SynthCall::Cancel);
        assert_eq!(calls[2], SynthCall::Cancel);
        let SynthCall::Speak(first) = &calls[1] else {
            panic!("expected utterance, got {:?}", calls[1]);
        };
        assert_eq!(first.text, "first [Hindi phrase]");
        assert_eq!(first.language, "en-IN");
        assert_eq!(first.rate, SPEECH_RATE);
        assert_eq!(first.pitch, SPEECH_PITCH);
        assert_eq!(synth.spoken(), vec!["first [Hindi phrase]", "rendered"]);
    }

    #[test]
    fn announce_respects_enabled_flag() {
        let synth = RecordingSynthesizer::new();
        let mut output = SpeechOutput::new(Box::new(synth.clone()), false);

        assert!(!output.announce("hello", None));
        assert!(synth.spoken().is_empty());

        output.set_enabled(true);
        assert!(output.announce("hello", None));
        assert_eq!(synth.spoken(), vec!["hello"]);
    }

    #[test]
    fn disabling_cancels_speech() {
        let synth = RecordingSynthesizer::new();
        let mut output = SpeechOutput::new(Box::new(synth.clone()), true);
        output.set_enabled(false);
        assert_eq!(synth.calls(), vec![SynthCall::Cancel]);
    }
}
