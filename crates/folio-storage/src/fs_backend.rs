//! Filesystem document store, the production default.
//!
//! Each document is a regular file directly under the root directory; the
//! file name is the document name. Sub-directories and dot-files in the root
//! are not documents and are skipped when listing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{DocumentStore, StorageError, validate_name};

/// A document store backed by a directory on disk.
///
/// # Examples
///
/// ```no_run
/// # use folio_storage::{DocumentStore, FsDocumentStore};
/// # #[tokio::main]
/// # async fn main() -> Result<(), folio_storage::StorageError> {
/// let store = FsDocumentStore::open("./data").await?;
/// store.write("about.md", b"# About").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Wrap an existing directory without touching the filesystem.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store at `root`, creating the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::Open {
                path: root.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { root })
    }

    /// The directory documents live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StorageError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FsDocumentStore {
    async fn list(&self) -> Result<Vec<String>, StorageError> {
        let list_err = |e: std::io::Error| StorageError::List {
            root: self.root.display().to_string(),
            reason: e.to_string(),
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(list_err)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            if entry.file_type().await.map_err(list_err)?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                tracing::debug!(path = ?entry.path(), "skipping non-UTF-8 file name");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                name: name.to_owned(),
            },
            _ => StorageError::Read {
                name: name.to_owned(),
                reason: e.to_string(),
            },
        })
    }

    async fn write(&self, name: &str, content: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| StorageError::Write {
                name: name.to_owned(),
                reason: e.to_string(),
            })
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        tokio::fs::remove_file(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                name: name.to_owned(),
            },
            _ => StorageError::Delete {
                name: name.to_owned(),
                reason: e.to_string(),
            },
        })
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path_for(name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Read {
                name: name.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}
