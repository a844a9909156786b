//! Error handling for the agreement engine
//!
//! Only the fallible edges of the engine return errors: loading configuration
//! and registry files, file-backed stores, and parsing answer literals.
//! Classification, ordering and rendering never fail; they degrade.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum AgreementError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid answer literal '{literal}': {reason}")]
    InvalidAnswer { literal: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration and registry loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown placeholder syntax '{0}', expected 'bracketed' or 'bare'")]
    UnknownSyntax(String),
}

/// Key/value store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AgreementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AgreementError::InvalidAnswer {
            literal: "money:12".to_string(),
            reason: "missing currency".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid answer literal 'money:12': missing currency"
        );

        let err: AgreementError = ConfigError::UnknownSyntax("curly".to_string()).into();
        assert!(err.to_string().contains("curly"));
    }
}
