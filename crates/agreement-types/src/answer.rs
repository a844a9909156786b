//! Canonical answer values.

use serde::{Deserialize, Serialize};

/// A single answer, keyed elsewhere by its canonical question.
///
/// Serialized untagged so the persisted JSON reads naturally:
/// `"text"`, `true`, `null`, `{"amount": "...", "currency": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CanonicalAnswer {
    /// Amount plus ISO currency code, substituted into two placeholders.
    Money { amount: String, currency: String },
    Bool(bool),
    Text(String),
    /// Explicitly not answered. Distinct from `Bool(false)`.
    #[default]
    Unanswered,
}

impl CanonicalAnswer {
    pub fn text(value: impl Into<String>) -> Self {
        CanonicalAnswer::Text(value.into())
    }

    pub fn money(amount: impl Into<String>, currency: impl Into<String>) -> Self {
        CanonicalAnswer::Money {
            amount: amount.into(),
            currency: currency.into(),
        }
    }

    /// Only an explicit `true` shows a governed clause.
    pub fn is_affirmative(&self) -> bool {
        matches!(self, CanonicalAnswer::Bool(true))
    }

    /// True for anything but `Unanswered` and blank text.
    pub fn is_answered(&self) -> bool {
        match self {
            CanonicalAnswer::Unanswered => false,
            CanonicalAnswer::Text(s) => !s.trim().is_empty(),
            CanonicalAnswer::Bool(_) | CanonicalAnswer::Money { .. } => true,
        }
    }

    /// Non-blank text content, trimmed.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CanonicalAnswer::Text(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }
}

impl From<bool> for CanonicalAnswer {
    fn from(value: bool) -> Self {
        CanonicalAnswer::Bool(value)
    }
}

impl From<&str> for CanonicalAnswer {
    fn from(value: &str) -> Self {
        CanonicalAnswer::Text(value.to_string())
    }
}

impl From<String> for CanonicalAnswer {
    fn from(value: String) -> Self {
        CanonicalAnswer::Text(value)
    }
}

impl<T: Into<CanonicalAnswer>> From<Option<T>> for CanonicalAnswer {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CanonicalAnswer::Unanswered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_shapes() {
        assert_eq!(
            serde_json::to_string(&CanonicalAnswer::text("Alice")).unwrap(),
            r#""Alice""#
        );
        assert_eq!(
            serde_json::to_string(&CanonicalAnswer::Bool(false)).unwrap(),
            "false"
        );
        assert_eq!(
            serde_json::to_string(&CanonicalAnswer::Unanswered).unwrap(),
            "null"
        );
        assert_eq!(
            serde_json::to_string(&CanonicalAnswer::money("50000", "GBP")).unwrap(),
            r#"{"amount":"50000","currency":"GBP"}"#
        );
    }

    #[test]
    fn test_parse_each_variant() {
        let parsed: Vec<CanonicalAnswer> =
            serde_json::from_str(r#"["x", true, null, {"amount": "1", "currency": "EUR"}]"#)
                .unwrap();
        assert_eq!(
            parsed,
            vec![
                CanonicalAnswer::text("x"),
                CanonicalAnswer::Bool(true),
                CanonicalAnswer::Unanswered,
                CanonicalAnswer::money("1", "EUR"),
            ]
        );
    }

    #[test]
    fn test_unanswered_is_not_false() {
        assert!(!CanonicalAnswer::Unanswered.is_affirmative());
        assert!(!CanonicalAnswer::Bool(false).is_affirmative());
        assert!(CanonicalAnswer::Bool(true).is_affirmative());
        assert!(CanonicalAnswer::Bool(false).is_answered());
        assert!(!CanonicalAnswer::Unanswered.is_answered());
        assert!(!CanonicalAnswer::text("   ").is_answered());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(
            CanonicalAnswer::from(None::<bool>),
            CanonicalAnswer::Unanswered
        );
        assert_eq!(CanonicalAnswer::from(Some(true)), CanonicalAnswer::Bool(true));
    }
}
