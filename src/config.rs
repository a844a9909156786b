//! Engine configuration
//!
//! Loaded from YAML (`config/agreement.yaml`); any field left out falls back
//! to its environment variable, then to a built-in default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::registry::PlaceholderRegistry;
use crate::render::{
    DerivedValueConfig, PlaceholderSyntax, RenderOptions, Theme, DEFAULT_HIGHLIGHT_CLASS,
    DEFAULT_LOCATION_FALLBACK, EMPLOYMENT_AGREEMENT_TEMPLATE,
};

pub const ENV_HIGHLIGHT_CLASS: &str = "AGREEMENT_HIGHLIGHT_CLASS";
pub const ENV_PLACEHOLDER_SYNTAX: &str = "AGREEMENT_PLACEHOLDER_SYNTAX";
pub const ENV_TEMPLATE: &str = "AGREEMENT_TEMPLATE";
pub const ENV_REGISTRY: &str = "AGREEMENT_REGISTRY";
pub const ENV_SESSION_FILE: &str = "AGREEMENT_SESSION_FILE";
pub const ENV_SIDE_CHANNEL_FILE: &str = "AGREEMENT_SIDE_CHANNEL_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// CSS class of the span wrapping substituted answers
    pub highlight_class: String,
    pub placeholder_syntax: PlaceholderSyntax,
    pub location_fallback_label: String,
    /// Template file; the bundled employment agreement when unset
    pub template_path: Option<PathBuf>,
    /// Registry YAML replacing the built-in registry
    pub registry_path: Option<PathBuf>,
    pub session_file: PathBuf,
    pub side_channel_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            highlight_class: std::env::var(ENV_HIGHLIGHT_CLASS)
                .unwrap_or_else(|_| DEFAULT_HIGHLIGHT_CLASS.to_string()),
            placeholder_syntax: std::env::var(ENV_PLACEHOLDER_SYNTAX)
                .ok()
                .and_then(|s| {
                    s.parse()
                        .map_err(|e: ConfigError| warn!(error = %e, "Ignoring {}", ENV_PLACEHOLDER_SYNTAX))
                        .ok()
                })
                .unwrap_or_default(),
            location_fallback_label: DEFAULT_LOCATION_FALLBACK.to_string(),
            template_path: std::env::var_os(ENV_TEMPLATE).map(PathBuf::from),
            registry_path: std::env::var_os(ENV_REGISTRY).map(PathBuf::from),
            session_file: std::env::var_os(ENV_SESSION_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".agreement/session.json")),
            side_channel_file: std::env::var_os(ENV_SIDE_CHANNEL_FILE)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".agreement/side-channel.json")),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            origin: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|source| {
            ConfigError::Yaml {
                origin: "config".to_string(),
                source,
            }
            .into()
        })
    }

    /// Configured registry, or the built-in one
    pub fn registry(&self) -> Result<PlaceholderRegistry> {
        match &self.registry_path {
            Some(path) => PlaceholderRegistry::load(path),
            None => Ok(PlaceholderRegistry::builtin()),
        }
    }

    /// Configured template text, or the bundled employment agreement
    pub fn template(&self) -> Result<String> {
        match &self.template_path {
            Some(path) => std::fs::read_to_string(path).map_err(|source| {
                ConfigError::Read {
                    path: path.clone(),
                    source,
                }
                .into()
            }),
            None => Ok(EMPLOYMENT_AGREEMENT_TEMPLATE.to_string()),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::new(&self.highlight_class)
    }

    pub fn render_options(&self, derived: DerivedValueConfig) -> RenderOptions {
        RenderOptions {
            syntax: self.placeholder_syntax,
            location_fallback_label: self.location_fallback_label.clone(),
            derived,
        }
    }
}
