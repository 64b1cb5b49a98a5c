//! Q&A corpus records.
//!
//! Records come from the offline index build as JSON Lines; field names
//! mirror the corpus CSV columns, slashes and all.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// One record of the placement Q&A corpus.
///
/// The corpus contains nulls where the source spreadsheet had blanks, so
/// every text field tolerates null and missing alike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(default)]
    pub id: Option<serde_json::Number>,
    #[serde(rename = "Category", default, deserialize_with = "null_to_empty")]
    pub category: String,
    #[serde(rename = "Sub_Category", default, deserialize_with = "null_to_empty")]
    pub sub_category: String,
    #[serde(rename = "title/entity_name", default, deserialize_with = "null_to_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub questions: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub answers: String,
    #[serde(rename = "additional_info/tags", default, deserialize_with = "null_to_empty")]
    pub tags: String,
    #[serde(default, deserialize_with = "null_to_empty")]
    pub context_text: String,
}

fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnswerRecord {
    /// The text embedded for retrieval. Uses the precomputed context
    /// from the index build when present, otherwise assembles it from
    /// the record fields.
    pub fn context(&self) -> String {
        if !self.context_text.trim().is_empty() {
            return self.context_text.clone();
        }
        let mut parts = Vec::new();
        if !self.category.trim().is_empty() {
            parts.push(format!("Category: {}", self.category));
        }
        if !self.sub_category.trim().is_empty() {
            parts.push(format!("Sub-Category: {}", self.sub_category));
        }
        if !self.title.trim().is_empty() {
            parts.push(format!("Title: {}", self.title));
        }
        if !self.answers.trim().is_empty() {
            parts.push(format!("Answer: {}", self.answers));
        }
        if !self.tags.trim().is_empty() {
            parts.push(format!("Tags: {}", self.tags));
        }
        parts.join(" \n ")
    }

    /// The answer text to speak aloud, if the record has one.
    pub fn spoken_answer(&self) -> Option<&str> {
        let answer = self.answers.trim();
        if answer.is_empty() { None } else { Some(answer) }
    }

    /// Multi-line display form for the chat surface.
    pub fn format_answer(&self) -> String {
        let mut parts = Vec::new();
        if !self.title.trim().is_empty() {
            parts.push(format!("Title: {}", self.title.trim()));
        }
        if !self.category.trim().is_empty() {
            parts.push(format!("Category: {}", self.category.trim()));
        }
        if !self.sub_category.trim().is_empty() {
            parts.push(format!("Sub-Category: {}", self.sub_category.trim()));
        }
        if !self.answers.trim().is_empty() {
            parts.push(format!("Answer: {}", self.answers.trim()));
        }
        if !self.tags.trim().is_empty() {
            parts.push(format!("Tags: {}", self.tags.trim()));
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_corpus_field_names() {
        let json = r#"{
            "id": 7,
            "Category": "Placements",
            "Sub_Category": "Cutoffs",
            "title/entity_name": "CSE Placement Cutoff",
            "questions": "what is the placement cutoff\nminimum cgpa for placements",
            "answers": "The minimum CGPA for placement eligibility is 6.0.",
            "additional_info/tags": "cgpa, eligibility",
            "context_text": "Category: Placements \n Answer: The minimum CGPA..."
        }"#;

        let record: AnswerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, "Placements");
        assert_eq!(record.title, "CSE Placement Cutoff");
        assert_eq!(record.tags, "cgpa, eligibility");
        assert_eq!(record.id.unwrap().as_i64(), Some(7));
    }

    #[test]
    fn tolerates_nulls_and_missing_fields() {
        let record: AnswerRecord =
            serde_json::from_str(r#"{"Category": null, "answers": "Yes."}"#).unwrap();
        assert_eq!(record.category, "");
        assert_eq!(record.answers, "Yes.");
        assert!(record.id.is_none());
    }

    #[test]
    fn spoken_answer_skips_blank_text() {
        let record = AnswerRecord {
            answers: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(record.spoken_answer(), None);

        let record = AnswerRecord {
            answers: " The fee is 85000 per year. ".to_string(),
            ..Default::default()
        };
        assert_eq!(record.spoken_answer(), Some("The fee is 85000 per year."));
    }

    #[test]
    fn format_answer_includes_only_populated_fields() {
        let record = AnswerRecord {
            title: "Hostel Fees".to_string(),
            answers: "Hostel fees are 60000 per year.".to_string(),
            ..Default::default()
        };
        assert_eq!(
            record.format_answer(),
            "Title: Hostel Fees\nAnswer: Hostel fees are 60000 per year."
        );
    }

    #[test]
    fn context_prefers_precomputed_text() {
        let record = AnswerRecord {
            context_text: "precomputed".to_string(),
            category: "ignored".to_string(),
            ..Default::default()
        };
        assert_eq!(record.context(), "precomputed");
    }

    #[test]
    fn context_is_assembled_when_missing() {
        let record = AnswerRecord {
            category: "Placements".to_string(),
            answers: "Top package was 44 LPA.".to_string(),
            ..Default::default()
        };
        assert_eq!(
            record.context(),
            "Category: Placements \n Answer: Top package was 44 LPA."
        );
    }
}
