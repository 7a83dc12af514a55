//! Shared application state for `Folio` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the document actions, the credential
//! file, and the session table.

use std::sync::Arc;

use folio_core::credentials::CredentialStore;
use folio_core::documents::Documents;
use folio_core::session::SessionStore;
use folio_storage::DocumentStore;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Document actions over the configured store.
    pub documents: Documents,
    /// Credential file used by sign-in.
    pub credentials: CredentialStore,
    /// Live sessions keyed by cookie id.
    pub sessions: Arc<SessionStore>,
    /// Whether the session cookie carries `Secure`.
    pub secure_cookie: bool,
}

impl AppState {
    /// Assemble state from its parts.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        credentials: CredentialStore,
        sessions: Arc<SessionStore>,
        secure_cookie: bool,
    ) -> Self {
        Self {
            documents: Documents::new(store),
            credentials,
            sessions,
            secure_cookie,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("credentials", &self.credentials.path())
            .finish_non_exhaustive()
    }
}
