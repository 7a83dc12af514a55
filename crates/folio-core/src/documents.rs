//! Document actions.
//!
//! [`Documents`] wraps a [`DocumentStore`] with the rules the web layer
//! relies on: new names are trimmed and must not be blank, viewing goes
//! through the renderer, and every mutation is logged by name.

use std::sync::Arc;

use folio_storage::DocumentStore;

use crate::error::DocumentError;
use crate::renderer::{self, Rendered};

/// Trim a submitted document name, rejecting blank input.
///
/// # Errors
///
/// Returns [`DocumentError::NameRequired`] if nothing is left after trimming.
pub fn normalize_name(raw: &str) -> Result<&str, DocumentError> {
    let name = raw.trim();
    if name.is_empty() {
        Err(DocumentError::NameRequired)
    } else {
        Ok(name)
    }
}

/// Document use-cases over a shared store.
#[derive(Clone)]
pub struct Documents {
    store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for Documents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Documents").finish_non_exhaustive()
    }
}

impl Documents {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Names of all documents, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the store cannot be listed.
    pub async fn list(&self) -> Result<Vec<String>, DocumentError> {
        Ok(self.store.list().await?)
    }

    /// Load and render a document for viewing.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] (including `NotFound`) or
    /// [`DocumentError::UnsupportedType`] when the extension has no render
    /// mode.
    pub async fn view(&self, name: &str) -> Result<Rendered, DocumentError> {
        let content = self.store.read(name).await?;
        renderer::render(name, content).ok_or_else(|| DocumentError::UnsupportedType {
            name: name.to_owned(),
        })
    }

    /// Raw content for the edit form, decoded lossily as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] (including `NotFound`).
    pub async fn source(&self, name: &str) -> Result<String, DocumentError> {
        let content = self.store.read(name).await?;
        Ok(String::from_utf8_lossy(&content).into_owned())
    }

    /// Create an empty document from a submitted name. Returns the name the
    /// document was stored under.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NameRequired`] for blank names, or
    /// [`DocumentError::Storage`] if the store rejects the name or fails.
    pub async fn create(&self, raw_name: &str) -> Result<String, DocumentError> {
        let name = normalize_name(raw_name)?;
        self.store.create(name).await?;
        tracing::info!(document = %name, "document created");
        Ok(name.to_owned())
    }

    /// Replace the content of a document, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] if the store rejects the name or
    /// fails.
    pub async fn update(&self, name: &str, content: &str) -> Result<(), DocumentError> {
        self.store.write(name, content.as_bytes()).await?;
        tracing::info!(document = %name, bytes = content.len(), "document updated");
        Ok(())
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Storage`] (including `NotFound`).
    pub async fn delete(&self, name: &str) -> Result<(), DocumentError> {
        self.store.delete(name).await?;
        tracing::info!(document = %name, "document deleted");
        Ok(())
    }
}
