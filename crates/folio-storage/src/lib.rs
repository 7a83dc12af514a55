//! Document storage abstraction for `Folio`.
//!
//! This crate defines the [`DocumentStore`] trait, a flat namespace of
//! documents, each identified by its file name (extension included) and
//! holding an opaque byte payload. It knows nothing about rendering,
//! sessions, or who is allowed to change what.
//!
//! Two implementations are provided:
//!
//! - [`FsDocumentStore`]: production default, one file per document in a root directory
//! - [`MemoryDocumentStore`]: in-memory, for testing only
//!
//! There is no locking across calls. Two writers racing on the same name
//! leave whichever write landed last.

mod error;
mod fs_backend;
mod memory;

pub use error::StorageError;
pub use fs_backend::FsDocumentStore;
pub use memory::MemoryDocumentStore;

/// A pluggable document store.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// List the names of all documents, sorted lexicographically.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::List`] if the store cannot be enumerated.
    async fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Read the full content of a document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the document does not exist,
    /// [`StorageError::InvalidName`] for unusable names, or
    /// [`StorageError::Read`] if the backend fails.
    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Store `content` as the full content of `name`, creating the document
    /// if needed and overwriting it otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] for unusable names or
    /// [`StorageError::Write`] if the backend fails.
    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError>;

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the document does not exist or
    /// [`StorageError::Delete`] if the backend fails.
    async fn delete(&self, name: &str) -> Result<(), StorageError>;

    /// Create an empty document. Overwrites an existing document of the same
    /// name.
    ///
    /// # Errors
    ///
    /// Same as [`write`](DocumentStore::write).
    async fn create(&self, name: &str) -> Result<(), StorageError> {
        self.write(name, &[]).await
    }

    /// Check whether a document exists.
    ///
    /// The default implementation calls [`read`](DocumentStore::read).
    /// Backends may override this with a cheaper check.
    ///
    /// # Errors
    ///
    /// Propagates any error from `read` other than `NotFound`.
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.read(name).await {
            Ok(_) => Ok(true),
            Err(StorageError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Check that `name` can be used as a document name.
///
/// A name must be non-empty, must not be `.` or `..`, and must not contain
/// path separators or NUL. Anything else (spaces, unicode, no extension) is
/// accepted.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] describing the first rule broken.
pub fn validate_name(name: &str) -> Result<(), StorageError> {
    let reason = if name.is_empty() {
        "name must not be empty"
    } else if name == "." || name == ".." {
        "name must not be a relative path component"
    } else if name.contains(['/', '\\']) {
        "name must not contain path separators"
    } else if name.contains('\0') {
        "name must not contain null bytes"
    } else {
        return Ok(());
    };

    Err(StorageError::InvalidName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    })
}
