//! Fixed set of voice languages offered by the language selector.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub tag: &'static str,
    pub label: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "en-US";

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language {
        tag: "en-US",
        label: "English (US)",
    },
    Language {
        tag: "en-IN",
        label: "English (Indian)",
    },
    Language {
        tag: "hi-IN",
        label: "Hindi",
    },
    Language {
        tag: "es-ES",
        label: "Spanish",
    },
    Language {
        tag: "fr-FR",
        label: "French",
    },
    Language {
        tag: "de-DE",
        label: "German",
    },
    Language {
        tag: "ja-JP",
        label: "Japanese",
    },
    Language {
        tag: "zh-CN",
        label: "Chinese (Simplified)",
    },
];

pub fn find_language(tag: &str) -> Option<&'static Language> {
    let tag = tag.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|language| language.tag.eq_ignore_ascii_case(tag))
}

/// Hindi recognition keeps speech output in the previously selected
/// language, since synthesized Hindi of mixed-script replies is unusable.
pub fn keeps_output_language(tag: &str) -> bool {
    tag.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("hi"))
}

/// Primary subtag, e.g. `en` for `en-US`.
pub fn primary_subtag(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_languages_with_unique_tags() {
        assert_eq!(SUPPORTED_LANGUAGES.len(), 8);
        let mut tags: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|l| l.tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 8);
        assert!(find_language(DEFAULT_LANGUAGE).is_some());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find_language("hi-in").map(|l| l.label), Some("Hindi"));
        assert!(find_language("pt-BR").is_none());
    }

    #[test]
    fn only_hindi_keeps_output_language() {
        assert!(keeps_output_language("hi-IN"));
        assert!(!keeps_output_language("en-IN"));
        assert!(!keeps_output_language("h"));
    }

    #[test]
    fn primary_subtag_splits_on_dash() {
        assert_eq!(primary_subtag("ja-JP"), "ja");
        assert_eq!(primary_subtag("en"), "en");
    }
}
