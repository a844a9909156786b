//! Question Ordering
//!
//! Turns the fragments a user selected in the document into a stable,
//! deduplicated question sequence.
//!
//! Steps, in order:
//! 1. Deduplicate by canonical question (unknown fragments by literal text)
//! 2. Drop follow-up questions whose parent was not selected, and place each
//!    remaining follow-up immediately after its parent
//! 3. Move the governing-country fragment to the end
//! 4. Apply the persisted permutation if it still fits, else identity
//!
//! Nothing here fails: stale permutations and misaligned collaborator lists
//! are logged and replaced by defaults.

use std::collections::{HashMap, HashSet};

use agreement_types::{AnswerKind, PersistedSession, QuestionEntry};
use serde::Serialize;
use tracing::{debug, warn};

use crate::classifier::{Classification, Classifier};
use crate::registry::builtin::GOVERNING_COUNTRY_FRAGMENT;
use crate::registry::{strip_brackets, PlaceholderRegistry};

/// A selection dropped because its question was already selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSelection {
    pub fragment: String,
    pub question: String,
    /// Fragment of the occurrence that was kept
    pub kept_fragment: String,
}

/// Result of ordering a selection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOutcome {
    pub entries: Vec<QuestionEntry>,
    /// Transient warnings for the UI
    pub duplicates: Vec<DuplicateSelection>,
    /// Follow-up fragments dropped because their parent was not selected
    pub suppressed: Vec<String>,
    /// Permutation to persist
    pub permutation: Vec<usize>,
    /// True when a persisted permutation was discarded as stale
    pub permutation_reset: bool,
}

impl OrderOutcome {
    /// Canonical questions in display order
    pub fn questions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.answer_key()).collect()
    }
}

#[derive(Debug, Clone)]
struct Selected {
    fragment: String,
    identity: String,
    classification: Classification,
}

/// Orders selected fragments into questionnaire entries
#[derive(Debug, Clone, Copy)]
pub struct QuestionOrderer<'r> {
    registry: &'r PlaceholderRegistry,
    classifier: Classifier<'r>,
}

impl<'r> QuestionOrderer<'r> {
    pub fn new(registry: &'r PlaceholderRegistry) -> Self {
        Self {
            registry,
            classifier: Classifier::new(registry),
        }
    }

    /// Order `selected` fragments, applying `persisted` when it is still a
    /// valid permutation of the resulting question list.
    pub fn order<S: AsRef<str>>(&self, selected: &[S], persisted: Option<&[usize]>) -> OrderOutcome {
        let (unique, duplicates) = self.deduplicate(selected);
        let (placed, suppressed) = self.apply_follow_ups(unique);
        let placed = move_governing_country_last(placed);

        let (permutation, permutation_reset) = match persisted {
            Some(p) if is_permutation(p, placed.len()) => (p.to_vec(), false),
            Some(p) => {
                warn!(
                    persisted_len = p.len(),
                    question_count = placed.len(),
                    "Discarding stale question order"
                );
                ((0..placed.len()).collect(), true)
            }
            None => ((0..placed.len()).collect(), false),
        };

        let entries = permutation
            .iter()
            .map(|&index| {
                let item = &placed[index];
                QuestionEntry {
                    raw_fragment: item.fragment.clone(),
                    canonical_question: item.classification.primary_question.clone(),
                    kind: item.classification.default_kind(),
                    label: item.identity.clone(),
                    required: false,
                    kind_changed: false,
                    order: index,
                }
            })
            .collect();

        OrderOutcome {
            entries,
            duplicates,
            suppressed,
            permutation,
            permutation_reset,
        }
    }

    fn deduplicate<S: AsRef<str>>(&self, selected: &[S]) -> (Vec<Selected>, Vec<DuplicateSelection>) {
        let mut kept: HashMap<String, String> = HashMap::new();
        let mut unique = Vec::new();
        let mut duplicates = Vec::new();

        for fragment in selected {
            let fragment = fragment.as_ref();
            if fragment.trim().is_empty() {
                debug!("Skipping blank selection");
                continue;
            }
            let classification = self.classifier.classify(fragment);
            let identity = classification.display_question(fragment).to_string();

            if let Some(kept_fragment) = kept.get(&identity) {
                warn!(question = %identity, fragment = %fragment, "Question already selected");
                duplicates.push(DuplicateSelection {
                    fragment: fragment.to_string(),
                    question: identity,
                    kept_fragment: kept_fragment.clone(),
                });
                continue;
            }

            kept.insert(identity.clone(), fragment.to_string());
            unique.push(Selected {
                fragment: fragment.to_string(),
                identity,
                classification,
            });
        }

        (unique, duplicates)
    }

    /// Drop orphaned follow-ups, then re-emit the list with every follow-up
    /// directly after its parent.
    fn apply_follow_ups(&self, unique: Vec<Selected>) -> (Vec<Selected>, Vec<String>) {
        let present: HashSet<String> = unique.iter().map(|s| s.identity.clone()).collect();
        let mut suppressed = Vec::new();

        let kept: Vec<Selected> = unique
            .into_iter()
            .filter(|item| match self.registry.parent_of(&item.identity) {
                Some(parent) if !present.contains(parent) => {
                    debug!(question = %item.identity, parent = %parent, "Suppressing follow-up without parent");
                    suppressed.push(item.fragment.clone());
                    false
                }
                _ => true,
            })
            .collect();

        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (index, item) in kept.iter().enumerate() {
            match self.registry.parent_of(&item.identity) {
                Some(parent) => children.entry(parent).or_default().push(index),
                None => roots.push(index),
            }
        }

        let mut placed_indices = Vec::with_capacity(kept.len());
        let mut visited = vec![false; kept.len()];
        for root in roots {
            place(root, &kept, &children, &mut visited, &mut placed_indices);
        }
        // Follow-up cycles have no root; keep them in selection order
        for index in 0..kept.len() {
            if !visited[index] {
                place(index, &kept, &children, &mut visited, &mut placed_indices);
            }
        }

        let mut slots: Vec<Option<Selected>> = kept.into_iter().map(Some).collect();
        let placed = placed_indices
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();
        (placed, suppressed)
    }
}

fn place(
    index: usize,
    items: &[Selected],
    children: &HashMap<&str, Vec<usize>>,
    visited: &mut [bool],
    out: &mut Vec<usize>,
) {
    if visited[index] {
        return;
    }
    visited[index] = true;
    out.push(index);
    if let Some(kids) = children.get(items[index].identity.as_str()) {
        for &child in kids {
            place(child, items, children, visited, out);
        }
    }
}

fn move_governing_country_last(items: Vec<Selected>) -> Vec<Selected> {
    let (country, mut rest): (Vec<_>, Vec<_>) = items
        .into_iter()
        .partition(|item| {
            let trimmed = item.fragment.trim();
            strip_brackets(trimmed).unwrap_or(trimmed) == GOVERNING_COUNTRY_FRAGMENT
        });
    rest.extend(country);
    rest
}

/// True when `candidate` is a permutation of `0..len`
pub fn is_permutation(candidate: &[usize], len: usize) -> bool {
    if candidate.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in candidate {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

// =============================================================================
// Positional alignment of collaborator lists
// =============================================================================

/// Per-question edits from the questionnaire UI, positionally aligned with
/// the ordered entries. Lists may be shorter or longer than the entry list.
#[derive(Debug, Clone, Default)]
pub struct SelectionInput {
    pub kinds: Vec<String>,
    pub labels: Vec<String>,
    pub required: Vec<bool>,
    pub kind_changed: Vec<bool>,
}

impl SelectionInput {
    /// Kind labels and override flags from a persisted session
    pub fn from_session(session: &PersistedSession) -> Self {
        Self {
            kinds: session.selected_question_types.clone(),
            kind_changed: session.type_changed_states.clone(),
            ..Default::default()
        }
    }
}

/// Apply UI edits onto ordered entries. Extra items are ignored, missing
/// items keep the detected defaults, unparsable kinds are ignored.
pub fn align_selection(entries: &mut [QuestionEntry], input: &SelectionInput) {
    let expected = entries.len();
    for (name, len) in [
        ("kinds", input.kinds.len()),
        ("labels", input.labels.len()),
        ("required", input.required.len()),
        ("kind_changed", input.kind_changed.len()),
    ] {
        if len != 0 && len != expected {
            warn!(list = name, len, expected, "Selection list length mismatch, truncating/padding");
        }
    }

    for (i, entry) in entries.iter_mut().enumerate() {
        let detected = entry.kind;
        if let Some(kind) = input.kinds.get(i) {
            match kind.parse::<AnswerKind>() {
                Ok(AnswerKind::Unknown) => {}
                Ok(kind) => entry.kind = kind,
                Err(e) => warn!(position = i, error = %e, "Ignoring persisted kind"),
            }
        }
        entry.kind_changed = input
            .kind_changed
            .get(i)
            .copied()
            .unwrap_or(entry.kind != detected);
        if let Some(label) = input.labels.get(i).filter(|l| !l.trim().is_empty()) {
            entry.label = label.trim().to_string();
        }
        if let Some(&required) = input.required.get(i) {
            entry.required = required;
        }
    }
}
