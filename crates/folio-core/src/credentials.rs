//! Credential file and password verification.
//!
//! The credential file is a flat YAML mapping of username to bcrypt hash:
//!
//! ```yaml
//! admin: $2b$12$...
//! ```
//!
//! It is re-read on every verification so edits take effect without a
//! restart. Verification fails closed: a missing file, a parse error, an
//! unknown user and a malformed hash all verify as `false`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::CredentialError;

/// Cost used when hashing new passwords.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// Username → password hash, sorted so the file is written deterministically.
pub type Credentials = BTreeMap<String, String>;

/// Reads and verifies against a credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Point at a credential file. The file is not read until needed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the credential file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full mapping. An empty file is an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Read`] if the file cannot be read or
    /// [`CredentialError::Parse`] if it is not a string-to-string mapping.
    pub async fn load(&self) -> Result<Credentials, CredentialError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CredentialError::Read {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        if raw.trim().is_empty() {
            return Ok(Credentials::new());
        }

        serde_yaml::from_str(&raw).map_err(|e| CredentialError::Parse {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Check `password` against the stored hash for `username`.
    pub async fn verify(&self, username: &str, password: &str) -> bool {
        let credentials = match self.load().await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "credential file unavailable, rejecting sign-in");
                return false;
            }
        };

        let Some(hash) = credentials.get(username).cloned() else {
            return false;
        };

        let username = username.to_owned();
        let password = password.to_owned();
        // bcrypt is CPU-bound; run it on the blocking pool.
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await;

        match outcome {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::warn!(username = %username, error = %e, "malformed password hash");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "password verification task failed");
                false
            }
        }
    }

    /// Insert or replace the hash for `username` and write the file back,
    /// creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidUsername`] for blank usernames,
    /// [`CredentialError::Parse`] if the existing file is malformed, or
    /// [`CredentialError::Write`] if the file cannot be written.
    pub async fn set(&self, username: &str, hash: &str) -> Result<(), CredentialError> {
        if username.trim().is_empty() {
            return Err(CredentialError::InvalidUsername {
                username: username.to_owned(),
            });
        }

        let mut credentials = match self.load().await {
            Ok(c) => c,
            Err(CredentialError::Read { .. }) if !self.path.exists() => Credentials::new(),
            Err(e) => return Err(e),
        };
        credentials.insert(username.to_owned(), hash.to_owned());

        let write_err = |reason: String| CredentialError::Write {
            path: self.path.display().to_string(),
            reason,
        };
        let yaml = serde_yaml::to_string(&credentials).map_err(|e| write_err(e.to_string()))?;
        tokio::fs::write(&self.path, yaml)
            .await
            .map_err(|e| write_err(e.to_string()))
    }
}

/// Hash a password with bcrypt at the given cost.
///
/// # Errors
///
/// Returns [`CredentialError::Hash`] if the cost is out of range.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    bcrypt::hash(password, cost).map_err(|e| CredentialError::Hash {
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store_with(contents: &str) -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.yml");
        tokio::fs::write(&path, contents).await.unwrap();
        (dir, CredentialStore::new(path))
    }

    #[tokio::test]
    async fn verify_accepts_correct_password() {
        let hash = hash_password("secret", 4).unwrap();
        let (_dir, store) = store_with(&format!("admin: '{hash}'\n")).await;
        assert!(store.verify("admin", "secret").await);
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password() {
        let hash = hash_password("secret", 4).unwrap();
        let (_dir, store) = store_with(&format!("admin: '{hash}'\n")).await;
        assert!(!store.verify("admin", "guess").await);
    }

    #[tokio::test]
    async fn verify_rejects_unknown_user() {
        let hash = hash_password("secret", 4).unwrap();
        let (_dir, store) = store_with(&format!("admin: '{hash}'\n")).await;
        assert!(!store.verify("mallory", "secret").await);
    }

    #[tokio::test]
    async fn malformed_hash_fails_closed() {
        let (_dir, store) = store_with("admin: not-a-bcrypt-hash\n").await;
        assert!(!store.verify("admin", "not-a-bcrypt-hash").await);
    }

    #[tokio::test]
    async fn missing_file_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("absent.yml"));
        assert!(!store.verify("admin", "secret").await);
        assert!(matches!(
            store.load().await,
            Err(CredentialError::Read { .. })
        ));
    }

    #[tokio::test]
    async fn unparsable_file_is_parse_error() {
        let (_dir, store) = store_with("- just\n- a list\n").await;
        assert!(matches!(
            store.load().await,
            Err(CredentialError::Parse { .. })
        ));
        assert!(!store.verify("just", "a list").await);
    }

    #[tokio::test]
    async fn empty_file_is_empty_mapping() {
        let (_dir, store) = store_with("").await;
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_creates_file_and_preserves_other_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("users.yml"));

        store.set("admin", &hash_password("one", 4).unwrap()).await.unwrap();
        store.set("editor", &hash_password("two", 4).unwrap()).await.unwrap();
        store.set("admin", &hash_password("three", 4).unwrap()).await.unwrap();

        let creds = store.load().await.unwrap();
        assert_eq!(creds.len(), 2);
        assert!(store.verify("admin", "three").await);
        assert!(!store.verify("admin", "one").await);
        assert!(store.verify("editor", "two").await);
    }

    #[tokio::test]
    async fn set_rejects_blank_username() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("users.yml"));
        assert!(matches!(
            store.set("  ", "hash").await,
            Err(CredentialError::InvalidUsername { .. })
        ));
    }
}
