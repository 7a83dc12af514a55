//! Error types for `folio-core`.
//!
//! Credential errors never include password material, only the file path or
//! the username involved.

use folio_storage::StorageError;

/// Errors from loading or updating the credential file.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The credential file could not be read.
    #[error("failed to read credential file '{path}': {reason}")]
    Read { path: String, reason: String },

    /// The credential file is not a `username: hash` YAML mapping.
    #[error("failed to parse credential file '{path}': {reason}")]
    Parse { path: String, reason: String },

    /// The credential file could not be written.
    #[error("failed to write credential file '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Hashing a password failed.
    #[error("failed to hash password: {reason}")]
    Hash { reason: String },

    /// A username that cannot be stored (empty or whitespace-only).
    #[error("invalid username '{username}'")]
    InvalidUsername { username: String },
}

/// Errors from document actions.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// A document name was empty or whitespace-only.
    #[error("a document name is required")]
    NameRequired,

    /// The document cannot be displayed because its extension has no
    /// render mode.
    #[error("document '{name}' has an unsupported type")]
    UnsupportedType { name: String },

    /// The underlying store failed or rejected the request.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
