//! Detection of Hindi content in replies and the follow-up request that asks
//! for an English rendering to read aloud.

use std::ops::RangeInclusive;

use crate::api::CompletionRequest;

const DEVANAGARI: RangeInclusive<char> = '\u{0900}'..='\u{097F}';

/// Romanized phrases the default persona is prompted to use.
pub const TRANSLITERATED_MARKERS: [&str; 4] =
    ["chamak raha hai", "haanji", "swaad", "baap concept"];

pub fn contains_source_script(text: &str) -> bool {
    text.chars().any(|c| DEVANAGARI.contains(&c))
        || TRANSLITERATED_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
}

/// Request asking the model to rewrite `reply` as English suitable for
/// speech synthesis.
pub fn speech_rendering_request(reply: &str) -> CompletionRequest {
    CompletionRequest::single(format!(
        "Convert the following text to proper English for text-to-speech, keeping the \
         technical content intact but replacing Hindi phrases with English equivalents: \"{reply}\""
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_devanagari_characters() {
        assert!(contains_source_script("Binary search is बढ़िया"));
        assert!(contains_source_script("\u{0900}"));
        assert!(contains_source_script("\u{097F}"));
        assert!(!contains_source_script("\u{0980}"));
    }

    #[test]
    fn detects_transliterated_markers() {
        assert!(contains_source_script("Concept chamak raha hai!"));
        assert!(contains_source_script("haanji, let's go"));
        assert!(contains_source_script("aa gya swaad"));
        assert!(contains_source_script("baap concept hai ye"));
        assert!(!contains_source_script("Plain English reply about heaps."));
    }

    #[test]
    fn rendering_request_quotes_reply_without_instruction() {
        let request = speech_rendering_request("haanji");
        assert!(request.system_instruction.is_none());
        assert_eq!(request.turns.len(), 1);
        assert!(request.turns[0].text.ends_with(": \"haanji\""));
        assert!(request.turns[0].text.starts_with("Convert the following text"));
    }
}
