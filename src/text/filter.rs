//! English-text filtering for recognition output.
//!
//! The recognition API occasionally returns text in another script when
//! it mishears background noise. Transcripts whose ASCII ratio falls
//! below a threshold are discarded rather than matched or searched.

/// Characters beyond alphanumerics that count as English text.
const ENGLISH_PUNCTUATION: &[char] = &[' ', '.', ',', '?', '!', '-', '\'', '"', '(', ')'];

/// Fraction of characters in `text` that look like English.
///
/// Returns 0.0 for empty or whitespace-only input.
pub fn english_ratio(text: &str) -> f32 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let total = trimmed.chars().count();
    let english = trimmed
        .chars()
        .filter(|c| c.is_ascii() && (c.is_alphanumeric() || ENGLISH_PUNCTUATION.contains(c)))
        .count();

    english as f32 / total as f32
}

/// Whether the text clears the given English-ratio threshold.
pub fn is_english(text: &str, threshold: f32) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    english_ratio(text) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn plain_english_scores_high() {
        let text = "What is the placement record for Computer Science?";
        assert!(english_ratio(text) > 0.95);
        assert!(is_english(text, defaults::ENGLISH_RATIO_THRESHOLD));
    }

    #[test]
    fn non_latin_script_scores_low() {
        let text = "नमस्ते आप कैसे हैं";
        assert!(english_ratio(text) < 0.5);
        assert!(!is_english(text, defaults::ENGLISH_RATIO_THRESHOLD));
    }

    #[test]
    fn mixed_text_sits_between() {
        let text = "placement के बारे में बताओ";
        let ratio = english_ratio(text);
        assert!(ratio > 0.0 && ratio < 0.8, "ratio was {}", ratio);
        assert!(!is_english(text, defaults::ENGLISH_RATIO_THRESHOLD));
    }

    #[test]
    fn empty_and_blank_are_not_english() {
        assert_eq!(english_ratio(""), 0.0);
        assert_eq!(english_ratio("   \t "), 0.0);
        assert!(!is_english("", defaults::ENGLISH_RATIO_THRESHOLD));
        assert!(!is_english("   ", defaults::ENGLISH_RATIO_THRESHOLD));
    }

    #[test]
    fn punctuation_counts_as_english() {
        assert_eq!(english_ratio("Hello, world! (How's it going?)"), 1.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        // 4 of 5 characters are English: ratio exactly 0.8
        let text = "abcdé";
        let ratio = english_ratio(text);
        assert!((ratio - 0.8).abs() < 1e-6);
        assert!(is_english(text, 0.8));
        assert!(!is_english(text, 0.81));
    }
}
