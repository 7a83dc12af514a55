//! Storage error types.
//!
//! Every variant carries the document name (or store root) and the
//! underlying reason so a log line alone is enough to diagnose it.

/// Errors that can occur during document storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The document does not exist.
    #[error("document '{name}' not found")]
    NotFound { name: String },

    /// The name cannot be used as a document name.
    #[error("invalid document name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Failed to open or create the store root.
    #[error("failed to open document store at '{path}': {reason}")]
    Open { path: String, reason: String },

    /// Failed to read a document.
    #[error("failed to read document '{name}': {reason}")]
    Read { name: String, reason: String },

    /// Failed to write a document.
    #[error("failed to write document '{name}': {reason}")]
    Write { name: String, reason: String },

    /// Failed to delete a document.
    #[error("failed to delete document '{name}': {reason}")]
    Delete { name: String, reason: String },

    /// Failed to enumerate the store.
    #[error("failed to list documents in '{root}': {reason}")]
    List { root: String, reason: String },
}

impl StorageError {
    /// Whether the store itself failed, as opposed to the caller asking for
    /// something missing or malformed.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::InvalidName { .. })
    }
}
