//! Answer Store
//!
//! Map from canonical question to its current answer. This is the only
//! mutable state a session has; everything else is derived from it.

pub mod session;
pub mod side_channel;
pub mod store;

use std::collections::BTreeMap;

use agreement_types::CanonicalAnswer;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

pub use session::SessionStore;
pub use side_channel::SideChannel;
pub use store::{FileStore, KeyValueStore, MemoryStore};

static UNANSWERED: CanonicalAnswer = CanonicalAnswer::Unanswered;

/// Answers keyed by canonical question, iterated in key order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: BTreeMap<String, CanonicalAnswer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an answer, returning the previous one
    pub fn set(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<CanonicalAnswer>,
    ) -> Option<CanonicalAnswer> {
        self.answers.insert(question.into(), answer.into())
    }

    /// Current answer; questions never answered read as `Unanswered`
    pub fn get(&self, question: &str) -> &CanonicalAnswer {
        self.answers.get(question).unwrap_or(&UNANSWERED)
    }

    pub fn contains(&self, question: &str) -> bool {
        self.answers.contains_key(question)
    }

    pub fn remove(&mut self, question: &str) -> Option<CanonicalAnswer> {
        self.answers.remove(question)
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalAnswer)> {
        self.answers.iter().map(|(q, a)| (q.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Number of questions with a real answer
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| a.is_answered()).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse persisted answers; corrupt input yields an empty store
    pub fn from_json_lenient(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "Discarding corrupt persisted answers");
                Self::default()
            }
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, CanonicalAnswer> {
        self.answers
    }
}

impl From<BTreeMap<String, CanonicalAnswer>> for AnswerStore {
    fn from(answers: BTreeMap<String, CanonicalAnswer>) -> Self {
        Self { answers }
    }
}

impl<Q: Into<String>, A: Into<CanonicalAnswer>> FromIterator<(Q, A)> for AnswerStore {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        Self {
            answers: iter
                .into_iter()
                .map(|(q, a)| (q.into(), a.into()))
                .collect(),
        }
    }
}
