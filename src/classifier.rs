//! Fragment Classifier
//!
//! Maps a raw template fragment to its answer kind and canonical question.
//!
//! Partitions are searched in a fixed order: Radio, Text, Number, Date. The
//! first partition that knows the fragment is primary. Every later partition
//! that also knows it overwrites the single alternate slot, so when three
//! partitions match, the alternate is the last one in search order.

use agreement_types::AnswerKind;
use serde::Serialize;
use tracing::debug;

use crate::registry::{PlaceholderRegistry, SEARCH_ORDER};

/// Result of classifying one fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub primary_kind: AnswerKind,
    /// Empty when no partition knows the fragment
    pub primary_question: String,
    /// Kinds the user may pick, always the full selectable set
    pub valid_kinds: Vec<AnswerKind>,
    pub alternate_kind: Option<AnswerKind>,
    pub alternate_question: Option<String>,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            primary_kind: AnswerKind::Unknown,
            primary_question: String::new(),
            valid_kinds: AnswerKind::SELECTABLE.to_vec(),
            alternate_kind: None,
            alternate_question: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.primary_kind != AnswerKind::Unknown
    }

    pub fn is_ambiguous(&self) -> bool {
        self.alternate_kind.is_some()
    }

    /// Question shown to the user: the canonical question, or the literal
    /// fragment for unknown fragments.
    pub fn display_question<'a>(&'a self, fragment: &'a str) -> &'a str {
        if self.is_known() {
            &self.primary_question
        } else {
            fragment.trim()
        }
    }

    /// Kind a questionnaire entry starts with. Unknown fragments are free text.
    pub fn default_kind(&self) -> AnswerKind {
        if self.is_known() {
            self.primary_kind
        } else {
            AnswerKind::Text
        }
    }
}

/// Classifies fragments against a registry
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'r> {
    registry: &'r PlaceholderRegistry,
}

impl<'r> Classifier<'r> {
    pub fn new(registry: &'r PlaceholderRegistry) -> Self {
        Self { registry }
    }

    /// Classify a fragment. Never fails; unknown fragments classify as
    /// `AnswerKind::Unknown` with an empty question.
    pub fn classify(&self, fragment: &str) -> Classification {
        let mut result = Classification::unknown();

        for kind in SEARCH_ORDER {
            let Some(question) = self.registry.lookup(kind, fragment) else {
                continue;
            };
            if result.is_known() {
                result.alternate_kind = Some(kind);
                result.alternate_question = Some(question.to_string());
            } else {
                result.primary_kind = kind;
                result.primary_question = question.to_string();
            }
        }

        if !result.is_known() {
            debug!(fragment = %fragment.trim(), "Fragment not in any registry, treating as free text");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin::{questions, PENSION_CLAUSE};

    #[test]
    fn test_radio_beats_number() {
        let registry = PlaceholderRegistry::builtin();
        let classifier = Classifier::new(&registry);

        let c = classifier.classify("[Bonus]");
        assert_eq!(c.primary_kind, AnswerKind::Radio);
        assert_eq!(c.primary_question, questions::BONUS_ELIGIBLE);
        assert_eq!(c.alternate_kind, Some(AnswerKind::Number));
        assert_eq!(c.alternate_question.as_deref(), Some(questions::BONUS_AMOUNT));
    }

    #[test]
    fn test_last_alternate_wins() {
        let mut registry = PlaceholderRegistry::new();
        registry.register(AnswerKind::Date, "Term", "date?");
        registry.register(AnswerKind::Number, "Term", "number?");
        registry.register(AnswerKind::Text, "Term", "text?");
        let c = Classifier::new(&registry).classify("Term");

        assert_eq!(c.primary_kind, AnswerKind::Text);
        assert_eq!(c.alternate_kind, Some(AnswerKind::Date));
        assert_eq!(c.alternate_question.as_deref(), Some("date?"));
    }

    #[test]
    fn test_unknown_fragment() {
        let registry = PlaceholderRegistry::builtin();
        let c = Classifier::new(&registry).classify("  some free text  ");

        assert_eq!(c.primary_kind, AnswerKind::Unknown);
        assert_eq!(c.primary_question, "");
        assert!(!c.is_ambiguous());
        assert_eq!(c.display_question("  some free text  "), "some free text");
        assert_eq!(c.default_kind(), AnswerKind::Text);
    }

    #[test]
    fn test_valid_kinds_always_full() {
        let registry = PlaceholderRegistry::builtin();
        let classifier = Classifier::new(&registry);
        for fragment in ["Employee Name", "Annual Salary", "nothing"] {
            assert_eq!(
                classifier.classify(fragment).valid_kinds,
                AnswerKind::SELECTABLE.to_vec()
            );
        }
    }

    #[test]
    fn test_full_clause_exact_match() {
        let registry = PlaceholderRegistry::builtin();
        let classifier = Classifier::new(&registry);

        let c = classifier.classify(PENSION_CLAUSE);
        assert_eq!(c.primary_kind, AnswerKind::Radio);
        assert_eq!(c.primary_question, questions::PENSION_APPLICABLE);

        let partial = &PENSION_CLAUSE[..30];
        assert!(!classifier.classify(partial).is_known());
    }
}
