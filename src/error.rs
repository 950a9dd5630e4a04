//! Error types for the property model and the durable store

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced to the command layer when resolving or setting a
/// property. Every variant carries a human-readable message; callers branch
/// on the variant rather than on control flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The raw value is not a prefix of any declared value.
    #[error("'{value}' does not match any of: {}", .candidates.join(", "))]
    NoMatch {
        value: String,
        candidates: Vec<String>,
    },

    /// The raw value is a prefix of more than one declared value.
    #[error("'{value}' is ambiguous; matches: {}", .candidates.join(", "))]
    Ambiguous {
        value: String,
        candidates: Vec<String>,
    },

    /// Generic validator or change-hook rejection.
    #[error("invalid value: {0}")]
    Invalid(String),

    /// No holder registered under the requested name.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// Malformed command invocation (wrong token count), distinct from a
    /// validation failure.
    #[error("{0}")]
    Syntax(String),
}

/// Write-side store failures. Read-side I/O never surfaces an error; a
/// missing or unreadable file degrades to "no data".
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
