//! Shared Types for the Agreement Engine
//!
//! This crate holds every type that crosses the boundary between the engine
//! and its collaborators (questionnaire UI, session storage, scoring).
//!
//! ## Rules
//!
//! 1. The canonical question string is the identity of an answer, never the
//!    raw template fragment
//! 2. Answers are a closed tagged union - no runtime shape probing
//! 3. JSON shapes match the persisted session keys exactly

pub mod answer;
pub mod question;
pub mod session;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use answer::CanonicalAnswer;
pub use question::QuestionEntry;
pub use session::PersistedSession;

// ============================================================================
// ANSWER KINDS
// ============================================================================

/// Answer datatype classification of a question.
///
/// `Paragraph` and `Email` are presentation variants of `Text`; they have no
/// registry of their own. `Unknown` is only ever produced by classification
/// of a fragment no registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerKind {
    Text,
    Paragraph,
    Email,
    Number,
    Date,
    Radio,
    Unknown,
}

impl AnswerKind {
    /// Every kind a user may pick for a question, in display order.
    pub const SELECTABLE: [AnswerKind; 6] = [
        AnswerKind::Text,
        AnswerKind::Paragraph,
        AnswerKind::Email,
        AnswerKind::Number,
        AnswerKind::Date,
        AnswerKind::Radio,
    ];

    /// Collapse presentation variants onto the kind they present.
    pub fn base(self) -> AnswerKind {
        match self {
            AnswerKind::Paragraph | AnswerKind::Email => AnswerKind::Text,
            other => other,
        }
    }

    /// True when a picked kind counts as the expected one.
    ///
    /// Paragraph and Email both count as Text.
    pub fn is_equivalent(self, other: AnswerKind) -> bool {
        self.base() == other.base()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerKind::Text => "Text",
            AnswerKind::Paragraph => "Paragraph",
            AnswerKind::Email => "Email",
            AnswerKind::Number => "Number",
            AnswerKind::Date => "Date",
            AnswerKind::Radio => "Radio",
            AnswerKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a persisted kind label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindError(pub String);

impl fmt::Display for UnknownKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown answer kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKindError {}

impl FromStr for AnswerKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(AnswerKind::Text),
            "paragraph" => Ok(AnswerKind::Paragraph),
            "email" => Ok(AnswerKind::Email),
            "number" => Ok(AnswerKind::Number),
            "date" => Ok(AnswerKind::Date),
            "radio" => Ok(AnswerKind::Radio),
            "unknown" => Ok(AnswerKind::Unknown),
            _ => Err(UnknownKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_variants_equivalent_to_text() {
        assert!(AnswerKind::Paragraph.is_equivalent(AnswerKind::Text));
        assert!(AnswerKind::Email.is_equivalent(AnswerKind::Text));
        assert!(AnswerKind::Email.is_equivalent(AnswerKind::Paragraph));
        assert!(!AnswerKind::Number.is_equivalent(AnswerKind::Text));
        assert!(!AnswerKind::Radio.is_equivalent(AnswerKind::Date));
    }

    #[test]
    fn test_kind_parse_and_display() {
        for kind in AnswerKind::SELECTABLE {
            assert_eq!(kind.to_string().parse::<AnswerKind>().unwrap(), kind);
        }
        assert_eq!("  radio ".parse::<AnswerKind>().unwrap(), AnswerKind::Radio);
        assert!("checkbox".parse::<AnswerKind>().is_err());
    }

    #[test]
    fn test_selectable_excludes_unknown() {
        assert!(!AnswerKind::SELECTABLE.contains(&AnswerKind::Unknown));
        assert_eq!(AnswerKind::SELECTABLE.len(), 6);
    }
}
