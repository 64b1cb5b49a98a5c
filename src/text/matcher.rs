//! Wake-phrase matching over normalized transcript text.

use crate::defaults;

/// Normalizes text for matching: lowercase, trimmed, with internal
/// whitespace runs collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A set of wake phrases, matched by normalized substring containment.
///
/// Matching is pure text comparison: no audio state, no timing. The same
/// transcript always gives the same answer, which keeps wake behavior
/// testable without a microphone.
#[derive(Debug, Clone)]
pub struct WakePhraseSet {
    phrases: Vec<String>,
}

impl WakePhraseSet {
    /// Builds a phrase set, normalizing each phrase. Phrases that
    /// normalize to empty are dropped.
    pub fn new(phrases: &[String]) -> Self {
        let phrases = phrases
            .iter()
            .map(|p| normalize(p))
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases }
    }

    /// The built-in phrase set.
    pub fn builtin() -> Self {
        let phrases: Vec<String> = defaults::WAKE_PHRASES
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        Self::new(&phrases)
    }

    /// Returns the first configured phrase contained in the normalized
    /// text, or `None`.
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }
        self.phrases
            .iter()
            .find(|phrase| normalized.contains(phrase.as_str()))
            .map(String::as_str)
    }

    /// Whether the text contains any wake phrase.
    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// The normalized phrases in this set.
    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }
}
