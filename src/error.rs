// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use thiserror::Error;

use crate::enums::{KeyKind, RuleKind};

/// Boxed error handed back by an external key-provider backend
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, PolicyError>;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not unmarshal config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("config file not found{}", warning.as_deref().map(|w| format!(" ({w})")).unwrap_or_default())]
    ConfigNotFound { warning: Option<String> },

    #[error("can not compile regexp {pattern:?}: {source}")]
    RegexCompile {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("error loading config: no matching {kind} rules found for {path:?}")]
    NoMatchingRule { kind: RuleKind, path: String },

    #[error(
        "error loading config: cannot use more than one of encrypted_suffix, unencrypted_suffix, \
         encrypted_regex, unencrypted_regex, encrypted_comment_regex, or unencrypted_comment_regex \
         for the same rule (found: {})",
        fields.join(", ")
    )]
    ExclusiveOptionConflict { fields: Vec<&'static str> },

    #[error(
        "error loading config: more than one destinations were found in a single destination rule, \
         you can only use one per rule (found: {})",
        fields.join(", ")
    )]
    MultipleDestinations { fields: Vec<&'static str> },

    #[error("invalid {backend} key descriptor {value:?}: {reason}")]
    InvalidKeyDescriptor {
        backend: KeyKind,
        value: String,
        reason: String,
    },

    #[error("{backend} provider failed for key {key:?}: {source}")]
    Provider {
        backend: KeyKind,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("{backend} key {key:?} holds no encrypted data key")]
    MissingCiphertext { backend: KeyKind, key: String },
}

impl PolicyError {
    pub(crate) fn invalid_key(
        backend: KeyKind,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PolicyError::InvalidKeyDescriptor {
            backend,
            value: value.into(),
            reason: reason.into(),
        }
    }
}
