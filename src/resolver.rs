//! Placeholder resolution.
//!
//! Reverse lookup from a canonical question to the template fragment its
//! answer replaces.

use agreement_types::AnswerKind;

use crate::registry::PlaceholderRegistry;
use crate::render::PlaceholderSyntax;

/// Where a question's answer goes in the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPlaceholder<'r> {
    pub kind: AnswerKind,
    pub fragment: &'r str,
}

/// Reverse lookup over a registry
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderResolver<'r> {
    registry: &'r PlaceholderRegistry,
}

impl<'r> PlaceholderResolver<'r> {
    pub fn new(registry: &'r PlaceholderRegistry) -> Self {
        Self { registry }
    }

    /// Raw fragment for a question; first match across Radio, Text, Number,
    /// Date wins.
    pub fn resolve_fragment(&self, question: &str) -> Option<&'r str> {
        self.resolve(question).map(|r| r.fragment)
    }

    /// Fragment plus the partition it was found in
    pub fn resolve(&self, question: &str) -> Option<ResolvedPlaceholder<'r>> {
        self.registry
            .fragment_for(question)
            .map(|(kind, fragment)| ResolvedPlaceholder { kind, fragment })
    }

    /// Every question in one partition, in registration order
    pub fn questions(&self, kind: AnswerKind) -> impl Iterator<Item = &'r str> {
        self.registry.partition(kind).iter().map(|m| m.question.as_str())
    }

    /// Token as it appears in a template written in `syntax`
    pub fn resolve_token(&self, question: &str, syntax: PlaceholderSyntax) -> Option<String> {
        self.resolve_fragment(question).map(|f| syntax.token(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin::questions;

    #[test]
    fn test_resolve_fragment() {
        let registry = PlaceholderRegistry::builtin();
        let resolver = PlaceholderResolver::new(&registry);

        assert_eq!(resolver.resolve_fragment(questions::JOB_TITLE), Some("Job Title"));
        assert_eq!(resolver.resolve_fragment("Not a question"), None);
    }

    #[test]
    fn test_questions_by_partition() {
        let registry = PlaceholderRegistry::builtin();
        let resolver = PlaceholderResolver::new(&registry);

        let radio: Vec<&str> = resolver.questions(AnswerKind::Radio).collect();
        assert!(radio.contains(&questions::REMOTE_WORKING));
        assert!(!radio.contains(&questions::JOB_TITLE));
    }

    #[test]
    fn test_resolve_kind_of_ambiguous_fragment() {
        let registry = PlaceholderRegistry::builtin();
        let resolver = PlaceholderResolver::new(&registry);

        let eligible = resolver.resolve(questions::BONUS_ELIGIBLE).unwrap();
        let amount = resolver.resolve(questions::BONUS_AMOUNT).unwrap();
        assert_eq!(eligible.kind, AnswerKind::Radio);
        assert_eq!(amount.kind, AnswerKind::Number);
        assert_eq!(eligible.fragment, amount.fragment);
    }

    #[test]
    fn test_resolve_token_per_syntax() {
        let registry = PlaceholderRegistry::builtin();
        let resolver = PlaceholderResolver::new(&registry);

        assert_eq!(
            resolver.resolve_token(questions::EMPLOYEE_NAME, PlaceholderSyntax::Bracketed),
            Some("[Employee Name]".to_string())
        );
        assert_eq!(
            resolver.resolve_token(questions::EMPLOYEE_NAME, PlaceholderSyntax::Bare),
            Some("Employee Name".to_string())
        );
    }
}
