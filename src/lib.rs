//! Agreement Engine
//!
//! Renders an employment agreement template from a user's answers.
//!
//! ## Architecture
//!
//! ```text
//! selected fragments ──► Classifier ──► QuestionOrderer ──► QuestionEntry[]
//!                          │                                   │
//!                  PlaceholderRegistry                     AnswerStore
//!                          │                                   │
//!                  PlaceholderResolver ──► TemplateRenderer ◄──┘
//!                                               │
//!                                          RenderOutput
//! ```
//!
//! - [`registry`]: fragment → canonical question tables, one per answer kind
//! - [`classifier`]: primary and alternate kind of a selected fragment
//! - [`resolver`]: reverse lookup from question to template token
//! - [`ordering`]: dedup, follow-up placement and persisted permutations
//! - [`answers`]: answer map and key/value persistence
//! - [`render`]: the multi-pass renderer
//!
//! Classification, ordering and rendering never fail: unknown fragments,
//! stale state and unparsable numbers degrade to visible placeholders.

pub mod answers;
pub mod classifier;
pub mod config;
pub mod error;
pub mod ordering;
pub mod registry;
pub mod render;
pub mod resolver;

pub use agreement_types::{AnswerKind, CanonicalAnswer, PersistedSession, QuestionEntry};
pub use answers::{AnswerStore, FileStore, KeyValueStore, MemoryStore, SessionStore, SideChannel};
pub use classifier::{Classification, Classifier};
pub use config::EngineConfig;
pub use error::{AgreementError, ConfigError, Result, StoreError};
pub use ordering::{align_selection, OrderOutcome, QuestionOrderer, SelectionInput};
pub use registry::PlaceholderRegistry;
pub use render::{
    render, PlaceholderSyntax, RenderOptions, RenderOutput, RenderRules, TemplateRenderer, Theme,
};
pub use resolver::PlaceholderResolver;
