//! Session persistence over a key/value store.
//!
//! Each field of [`PersistedSession`] lives under its own key as JSON. A
//! missing key means "use the default"; a corrupt one is removed, logged and
//! replaced by the default.

use agreement_types::session::{
    KEY_QUESTION_ORDER, KEY_SELECTED_QUESTION_TYPES, KEY_TYPE_CHANGED_STATES, KEY_USER_ANSWERS,
};
use agreement_types::PersistedSession;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::store::KeyValueStore;
use super::AnswerStore;
use crate::error::Result;

#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load every persisted field, never failing
    pub fn load(&mut self) -> PersistedSession {
        PersistedSession {
            selected_question_types: self.read(KEY_SELECTED_QUESTION_TYPES),
            type_changed_states: self.read(KEY_TYPE_CHANGED_STATES),
            question_order: self.read(KEY_QUESTION_ORDER),
            user_answers: self.read(KEY_USER_ANSWERS),
        }
    }

    pub fn save(&mut self, session: &PersistedSession) -> Result<()> {
        self.write(KEY_SELECTED_QUESTION_TYPES, &session.selected_question_types)?;
        self.write(KEY_TYPE_CHANGED_STATES, &session.type_changed_states)?;
        self.write(KEY_QUESTION_ORDER, &session.question_order)?;
        self.write(KEY_USER_ANSWERS, &session.user_answers)
    }

    pub fn load_answers(&mut self) -> AnswerStore {
        AnswerStore::from(self.read::<std::collections::BTreeMap<_, _>>(KEY_USER_ANSWERS))
    }

    /// Persist the full answer map; called after every change
    pub fn save_answers(&mut self, answers: &AnswerStore) -> Result<()> {
        self.write(KEY_USER_ANSWERS, answers)
    }

    pub fn save_question_order(&mut self, order: &[usize]) -> Result<()> {
        self.write(KEY_QUESTION_ORDER, &order)
    }

    /// Forget everything this session persisted
    pub fn clear(&mut self) -> Result<()> {
        for key in [
            KEY_SELECTED_QUESTION_TYPES,
            KEY_TYPE_CHANGED_STATES,
            KEY_QUESTION_ORDER,
            KEY_USER_ANSWERS,
        ] {
            self.store.remove(key)?;
        }
        Ok(())
    }

    fn read<T: DeserializeOwned + Default>(&mut self, key: &str) -> T {
        let Some(raw) = self.store.get(key) else {
            debug!(key, "No persisted value, using default");
            return T::default();
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Discarding corrupt persisted value");
                if let Err(e) = self.store.remove(key) {
                    warn!(key, error = %e, "Failed to remove corrupt value");
                }
                T::default()
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, json)
    }
}
