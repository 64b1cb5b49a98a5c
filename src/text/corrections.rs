//! Transcript corrections for domain vocabulary.
//!
//! Recognition models mangle campus-specific names ("Mohit Mishra" comes
//! back as "mohit misra" or "mobile mishra") and expand abbreviations
//! inconsistently. Corrections are declarative (pattern, replacement)
//! pairs applied in order, case-insensitively, so tuning them for a new
//! campus means editing a table, not code.

/// Built-in correction pairs, applied before any configured pairs.
///
/// Order matters: longer, more specific patterns come before the short
/// ones they contain.
pub const BUILTIN_CORRECTIONS: &[(&str, &str)] = &[
    // Campus name
    ("arya college", "Arya College"),
    // Faculty names
    ("mohit mishra", "Mohit Mishra"),
    ("mohit misra", "Mohit Mishra"),
    ("mohit meshes", "Mohit Mishra"),
    ("mohit mission", "Mohit Mishra"),
    ("mohit misha", "Mohit Mishra"),
    ("mode mishra", "Mohit Mishra"),
    ("mobile mishra", "Mohit Mishra"),
    ("mohit mitra", "Mohit Mishra"),
    ("doctor arun arya", "Dr. Arun Arya"),
    ("professor arun arya", "Prof. Arun Arya"),
    ("arun aria", "Arun Arya"),
    ("aaron arya", "Arun Arya"),
    ("run arya", "Arun Arya"),
    ("arun arya", "Arun Arya"),
    // Departments
    ("mechanical development", "Mechanical Department"),
    ("mechanic department", "Mechanical Department"),
    ("mechanical departement", "Mechanical Department"),
    ("mechanical department", "Mechanical Department"),
    ("mechanical engineering", "Mechanical Engineering"),
    ("computer science department", "Computer Science Department"),
    ("computer department", "Computer Science Department"),
    ("computer science engineering", "Computer Science Engineering"),
    ("cse", "Computer Science Engineering"),
    ("electronics and communication", "Electronics and Communication Engineering"),
    ("ece", "Electronics and Communication Engineering"),
    ("electrical engineering", "Electrical Engineering"),
    ("electrical department", "Electrical Department"),
    ("civil engineering", "Civil Engineering"),
    ("civil department", "Civil Department"),
    ("information technology", "Information Technology"),
    ("it department", "Information Technology"),
    // Common terms
    ("head of department", "Head of Department"),
    ("hod", "HOD"),
    ("maam", "Ma'am"),
    ("madam", "Ma'am"),
];

/// Ordered, case-insensitive text corrections.
#[derive(Debug, Clone)]
pub struct Corrections {
    pairs: Vec<(String, String)>,
}

impl Corrections {
    /// The built-in correction table alone.
    pub fn builtin() -> Self {
        let pairs = BUILTIN_CORRECTIONS
            .iter()
            .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
            .collect();
        Self { pairs }
    }

    /// Built-in corrections followed by configured extras.
    ///
    /// Extras run after the built-ins, so a deployment can re-correct
    /// anything the built-in table produced.
    pub fn with_extras(extras: &[(String, String)]) -> Self {
        let mut corrections = Self::builtin();
        corrections
            .pairs
            .extend(extras.iter().filter(|(from, _)| !from.is_empty()).cloned());
        corrections
    }

    /// An empty table, for tests and passthrough setups.
    pub fn none() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Applies every pair in order and returns the corrected text.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (from, to) in &self.pairs {
            result = replace_case_insensitive(&result, from, to);
        }
        result
    }

    /// Number of active pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Replaces every case-insensitive occurrence of `from` with `to`,
/// leaving the rest of the text untouched.
fn replace_case_insensitive(text: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return text.to_string();
    }

    let lower_text = text.to_lowercase();
    let lower_from = from.to_lowercase();

    // Byte offsets in the lowercased copy only line up with the original
    // when lowercasing did not change lengths. Transcripts are ASCII in
    // practice; for anything else, fall back to exact-case replacement.
    if lower_text.len() != text.len() {
        return text.replace(from, to);
    }

    let mut result = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = lower_text[pos..].find(&lower_from) {
        let start = pos + found;
        result.push_str(&text[pos..start]);
        result.push_str(to);
        pos = start + lower_from.len();
    }
    result.push_str(&text[pos..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrects_faculty_name_variants() {
        let corrections = Corrections::builtin();
        assert_eq!(
            corrections.apply("who is mohit misra"),
            "who is Mohit Mishra"
        );
        assert_eq!(
            corrections.apply("ask mobile mishra about placements"),
            "ask Mohit Mishra about placements"
        );
    }

    #[test]
    fn expands_department_abbreviations() {
        let corrections = Corrections::builtin();
        assert_eq!(
            corrections.apply("what is the cse placement record"),
            "what is the Computer Science Engineering placement record"
        );
        assert_eq!(
            corrections.apply("tell me about ece"),
            "tell me about Electronics and Communication Engineering"
        );
    }

    #[test]
    fn application_is_case_insensitive() {
        let corrections = Corrections::builtin();
        assert_eq!(
            corrections.apply("WHO IS MOHIT MISRA"),
            "WHO IS Mohit Mishra"
        );
        assert_eq!(corrections.apply("Arya College jaipur"), "Arya College jaipur");
    }

    #[test]
    fn pairs_apply_in_order() {
        let corrections = Corrections::with_extras(&[
            ("alpha".to_string(), "beta".to_string()),
            ("beta".to_string(), "gamma".to_string()),
        ]);
        // The second pair sees the first pair's output
        assert_eq!(corrections.apply("alpha"), "gamma");
    }

    #[test]
    fn longer_patterns_win_over_contained_short_ones() {
        let corrections = Corrections::builtin();
        // "computer science engineering" must not be mangled by the
        // bare "cse" expansion
        assert_eq!(
            corrections.apply("computer science engineering cutoff"),
            "Computer Science Engineering cutoff"
        );
    }

    #[test]
    fn extras_run_after_builtins() {
        let corrections = Corrections::with_extras(&[(
            "Arya College".to_string(),
            "Arya College of Engineering".to_string(),
        )]);
        assert_eq!(
            corrections.apply("admission at arya college"),
            "admission at Arya College of Engineering"
        );
    }

    #[test]
    fn empty_extras_patterns_are_ignored() {
        let corrections = Corrections::with_extras(&[("".to_string(), "boom".to_string())]);
        assert_eq!(corrections.apply("unchanged text"), "unchanged text");
        assert_eq!(corrections.len(), BUILTIN_CORRECTIONS.len());
    }

    #[test]
    fn empty_table_is_passthrough() {
        let corrections = Corrections::none();
        assert!(corrections.is_empty());
        assert_eq!(corrections.apply("mohit misra"), "mohit misra");
    }

    #[test]
    fn replace_handles_multiple_occurrences() {
        assert_eq!(
            replace_case_insensitive("hod asked the HOD", "hod", "HOD"),
            "HOD asked the HOD"
        );
    }

    #[test]
    fn replace_handles_match_at_boundaries() {
        assert_eq!(replace_case_insensitive("CSE", "cse", "X"), "X");
        assert_eq!(replace_case_insensitive("cse first", "cse", "X"), "X first");
        assert_eq!(replace_case_insensitive("last cse", "cse", "X"), "last X");
    }

    #[test]
    fn builtin_table_has_no_empty_patterns() {
        for (from, to) in BUILTIN_CORRECTIONS {
            assert!(!from.is_empty());
            assert!(!to.is_empty());
            assert_eq!(*from, from.to_lowercase(), "patterns are stored lowercase");
        }
    }
}
