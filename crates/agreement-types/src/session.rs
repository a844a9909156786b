//! Persisted session shape.
//!
//! Each field is stored under its own key in a session-scoped key/value
//! store, JSON-encoded. A missing key means "use the default".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CanonicalAnswer;

/// Storage key for the per-question kind labels.
pub const KEY_SELECTED_QUESTION_TYPES: &str = "selectedQuestionTypes";
/// Storage key for the per-question kind-override flags.
pub const KEY_TYPE_CHANGED_STATES: &str = "typeChangedStates";
/// Storage key for the persisted permutation.
pub const KEY_QUESTION_ORDER: &str = "questionOrder";
/// Storage key for the answer map.
pub const KEY_USER_ANSWERS: &str = "userAnswers";

/// Everything a session persists between reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub selected_question_types: Vec<String>,
    #[serde(default)]
    pub type_changed_states: Vec<bool>,
    #[serde(default)]
    pub question_order: Vec<usize>,
    #[serde(default)]
    pub user_answers: BTreeMap<String, CanonicalAnswer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let session: PersistedSession = serde_json::from_str("{}").unwrap();
        assert_eq!(session, PersistedSession::default());
    }

    #[test]
    fn test_field_names_match_storage_keys() {
        let json = serde_json::to_value(PersistedSession::default()).unwrap();
        for key in [
            KEY_SELECTED_QUESTION_TYPES,
            KEY_TYPE_CHANGED_STATES,
            KEY_QUESTION_ORDER,
            KEY_USER_ANSWERS,
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
