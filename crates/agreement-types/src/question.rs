//! Question entries driving both the questionnaire and the renderer.

use serde::{Deserialize, Serialize};

use crate::AnswerKind;

/// One row of the questionnaire for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionEntry {
    /// Template text the user selected
    pub raw_fragment: String,
    /// Stable identity; empty for fragments no registry knows
    pub canonical_question: String,
    /// Kind shown in the questionnaire (detected or user override)
    pub kind: AnswerKind,
    /// Label shown to the user
    pub label: String,
    /// Only ever set by explicit user action
    #[serde(default)]
    pub required: bool,
    /// True when the user overrode the detected kind
    #[serde(default)]
    pub kind_changed: bool,
    /// Position of this entry in the deduplicated selection order
    pub order: usize,
}

impl QuestionEntry {
    /// Key under which this entry's answer is stored.
    ///
    /// Unknown fragments have no canonical question, so their literal text
    /// stands in as identity.
    pub fn answer_key(&self) -> &str {
        if self.canonical_question.is_empty() {
            self.raw_fragment.trim()
        } else {
            &self.canonical_question
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_key_falls_back_to_fragment() {
        let entry = QuestionEntry {
            raw_fragment: " some clause ".to_string(),
            canonical_question: String::new(),
            kind: AnswerKind::Unknown,
            label: "some clause".to_string(),
            required: false,
            kind_changed: false,
            order: 0,
        };
        assert_eq!(entry.answer_key(), "some clause");
    }

    #[test]
    fn test_camel_case_json() {
        let entry = QuestionEntry {
            raw_fragment: "Employee Name".to_string(),
            canonical_question: "What's the name of the employee?".to_string(),
            kind: AnswerKind::Text,
            label: "What's the name of the employee?".to_string(),
            required: true,
            kind_changed: false,
            order: 2,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["rawFragment"], "Employee Name");
        assert_eq!(json["kindChanged"], false);
        assert_eq!(json["order"], 2);
    }
}
