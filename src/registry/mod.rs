//! Placeholder Registry
//!
//! Static mapping from raw template fragments to canonical questions,
//! partitioned by answer kind. A fragment may legitimately appear in more
//! than one partition; the classifier decides which one is primary.
//!
//! The registry also carries the follow-up table: questions that are only
//! asked when their parent question was selected.
//!
//! # YAML format
//!
//! ```yaml
//! radio:
//!   - fragment: "Bonus"
//!     question: "Is the employee eligible for a bonus?"
//! number:
//!   - fragment: "Bonus"
//!     question: "What is the maximum bonus amount?"
//! follow_ups:
//!   - question: "What is the maximum bonus amount?"
//!     parent: "Is the employee eligible for a bonus?"
//! ```

pub mod builtin;

use std::collections::HashMap;
use std::path::Path;

use agreement_types::AnswerKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

/// Partitions in classifier search order.
pub const SEARCH_ORDER: [AnswerKind; 4] = [
    AnswerKind::Radio,
    AnswerKind::Text,
    AnswerKind::Number,
    AnswerKind::Date,
];

/// One fragment → question mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderMapping {
    /// Template search text (placeholder name or full clause text)
    pub fragment: String,
    /// Canonical question it stands for
    pub question: String,
}

impl PlaceholderMapping {
    pub fn new(fragment: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            question: question.into(),
        }
    }
}

/// A question only asked when its parent is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpRule {
    pub question: String,
    pub parent: String,
}

/// On-disk registry layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryFile {
    #[serde(default)]
    pub text: Vec<PlaceholderMapping>,
    #[serde(default)]
    pub number: Vec<PlaceholderMapping>,
    #[serde(default)]
    pub date: Vec<PlaceholderMapping>,
    #[serde(default)]
    pub radio: Vec<PlaceholderMapping>,
    #[serde(default)]
    pub follow_ups: Vec<FollowUpRule>,
}

/// Fragment → question registry, one partition per answer kind
#[derive(Debug, Clone, Default)]
pub struct PlaceholderRegistry {
    text: Vec<PlaceholderMapping>,
    number: Vec<PlaceholderMapping>,
    date: Vec<PlaceholderMapping>,
    radio: Vec<PlaceholderMapping>,
    /// child question → parent question
    follow_ups: HashMap<String, String>,
}

impl PlaceholderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The employment-agreement registry
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry);
        registry
    }

    /// Build from the on-disk layout
    pub fn from_file(file: RegistryFile) -> Self {
        let mut registry = Self {
            text: file.text,
            number: file.number,
            date: file.date,
            radio: file.radio,
            follow_ups: HashMap::new(),
        };
        for rule in file.follow_ups {
            registry.add_follow_up(rule.question, rule.parent);
        }
        for issue in registry.validate() {
            warn!(issue = %issue, "Registry inconsistency");
        }
        registry
    }

    /// Load registry from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            origin: "registry".to_string(),
            source,
        })?;
        Ok(Self::from_file(file))
    }

    /// Load registry from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RegistryFile =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                origin: path.display().to_string(),
                source,
            })?;
        debug!(path = %path.display(), "Loaded placeholder registry");
        Ok(Self::from_file(file))
    }

    /// Add a mapping to the partition for `kind`.
    ///
    /// Presentation variants land in the Text partition; `Unknown` is ignored.
    pub fn register(
        &mut self,
        kind: AnswerKind,
        fragment: impl Into<String>,
        question: impl Into<String>,
    ) {
        let mapping = PlaceholderMapping::new(fragment, question);
        match self.partition_mut(kind) {
            Some(partition) => partition.push(mapping),
            None => debug!(fragment = %mapping.fragment, "Ignoring mapping for unknown kind"),
        }
    }

    /// Declare `question` a follow-up of `parent`
    pub fn add_follow_up(&mut self, question: impl Into<String>, parent: impl Into<String>) {
        self.follow_ups.insert(question.into(), parent.into());
    }

    /// Mappings of one partition, in declaration order
    pub fn partition(&self, kind: AnswerKind) -> &[PlaceholderMapping] {
        match kind.base() {
            AnswerKind::Text => &self.text,
            AnswerKind::Number => &self.number,
            AnswerKind::Date => &self.date,
            AnswerKind::Radio => &self.radio,
            _ => &[],
        }
    }

    fn partition_mut(&mut self, kind: AnswerKind) -> Option<&mut Vec<PlaceholderMapping>> {
        match kind.base() {
            AnswerKind::Text => Some(&mut self.text),
            AnswerKind::Number => Some(&mut self.number),
            AnswerKind::Date => Some(&mut self.date),
            AnswerKind::Radio => Some(&mut self.radio),
            _ => None,
        }
    }

    /// Question mapped from `fragment` in one partition.
    ///
    /// Matches the trimmed fragment exactly, or the inner text of a
    /// bracketed fragment (`[X]` matches key `X`).
    pub fn lookup(&self, kind: AnswerKind, fragment: &str) -> Option<&str> {
        let trimmed = fragment.trim();
        let inner = strip_brackets(trimmed);
        self.partition(kind)
            .iter()
            .find(|m| m.fragment == trimmed || inner.is_some_and(|i| m.fragment == i))
            .map(|m| m.question.as_str())
    }

    /// First fragment mapping to `question`, in search order
    pub fn fragment_for(&self, question: &str) -> Option<(AnswerKind, &str)> {
        SEARCH_ORDER.iter().find_map(|&kind| {
            self.partition(kind)
                .iter()
                .find(|m| m.question == question)
                .map(|m| (kind, m.fragment.as_str()))
        })
    }

    /// Parent question of a follow-up question
    pub fn parent_of(&self, question: &str) -> Option<&str> {
        self.follow_ups.get(question).map(|s| s.as_str())
    }

    /// Total mapping count across partitions
    pub fn len(&self) -> usize {
        self.text.len() + self.number.len() + self.date.len() + self.radio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Report questions reachable from more than one fragment.
    ///
    /// Reverse lookup relies on each question having a single fragment; this
    /// is checked when a registry is loaded, never during lookups.
    pub fn validate(&self) -> Vec<String> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        let mut issues = Vec::new();
        for kind in SEARCH_ORDER {
            for mapping in self.partition(kind) {
                match seen.get(mapping.question.as_str()) {
                    Some(existing) if *existing != mapping.fragment => issues.push(format!(
                        "question '{}' is mapped from both '{}' and '{}'",
                        mapping.question, existing, mapping.fragment
                    )),
                    _ => {
                        seen.insert(&mapping.question, &mapping.fragment);
                    }
                }
            }
        }
        for (child, parent) in &self.follow_ups {
            if self.fragment_for(parent).is_none() {
                issues.push(format!(
                    "follow-up '{}' names unknown parent '{}'",
                    child, parent
                ));
            }
        }
        issues.sort();
        issues
    }
}

/// Inner text of `[X]`, if the fragment is bracketed
pub fn strip_brackets(fragment: &str) -> Option<&str> {
    fragment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_bracketed_and_bare() {
        let mut registry = PlaceholderRegistry::new();
        registry.register(AnswerKind::Text, "Employee Name", "Who?");

        assert_eq!(registry.lookup(AnswerKind::Text, "Employee Name"), Some("Who?"));
        assert_eq!(registry.lookup(AnswerKind::Text, " [Employee Name] "), Some("Who?"));
        assert_eq!(registry.lookup(AnswerKind::Number, "Employee Name"), None);
        assert_eq!(registry.lookup(AnswerKind::Text, "employee name"), None);
    }

    #[test]
    fn test_presentation_kinds_register_as_text() {
        let mut registry = PlaceholderRegistry::new();
        registry.register(AnswerKind::Email, "Contact Email", "Email?");
        registry.register(AnswerKind::Unknown, "Ignored", "Nope");

        assert_eq!(registry.partition(AnswerKind::Text).len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_fragment_for_uses_search_order() {
        let mut registry = PlaceholderRegistry::new();
        registry.register(AnswerKind::Date, "Late", "Q");
        registry.register(AnswerKind::Radio, "Early", "Q");

        assert_eq!(registry.fragment_for("Q"), Some((AnswerKind::Radio, "Early")));
        assert_eq!(registry.fragment_for("missing"), None);
    }

    #[test]
    fn test_validate_reports_duplicate_question() {
        let mut registry = PlaceholderRegistry::new();
        registry.register(AnswerKind::Text, "A", "Q");
        registry.register(AnswerKind::Number, "B", "Q");
        registry.add_follow_up("Q", "Parent?");

        let issues = registry.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.contains("'A' and 'B'")));
        assert!(issues.iter().any(|i| i.contains("unknown parent")));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
radio:
  - fragment: "Bonus"
    question: "Eligible for bonus?"
number:
  - fragment: "Bonus"
    question: "Bonus amount?"
follow_ups:
  - question: "Bonus amount?"
    parent: "Eligible for bonus?"
"#;
        let registry = PlaceholderRegistry::from_yaml(yaml).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.parent_of("Bonus amount?"), Some("Eligible for bonus?"));
        assert!(registry.validate().is_empty());
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = PlaceholderRegistry::from_yaml("radio: [1, 2").unwrap_err();
        assert!(err.to_string().contains("Invalid YAML"));
    }
}
