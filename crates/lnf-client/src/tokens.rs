//! Management-token persistence.
//!
//! The API only needs a narrow key-value store; [`TokenStore`] is that
//! interface, with an in-memory and a JSON-file implementation.
//! [`ManagementTokens`] layers the manage-page rules on top: an explicit
//! token wins and is remembered once the server accepts it, a stored token
//! the server rejects is forgotten, and deleting an item forgets its token.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use lnf_core::ManagedLostItem;
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::client::{is_blank, ApiClient};
use crate::error::RequestFailure;

/// Prefix of every stored management-token key.
pub const TOKEN_KEY_PREFIX: &str = "manage_token_";

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("token store at {path} is not a JSON object: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait TokenStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError>;

    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError>;

    /// Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Stores tokens as one JSON object in a file. A missing file is an empty
/// store; the parent directory is created on first write.
///
/// File I/O is synchronous. On a multi-threaded tokio runtime each call runs
/// under `block_in_place`, so other tasks move off the worker meanwhile. A
/// current-thread runtime is blocked for the length of the call.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(TokenStoreError::Io {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| TokenStoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        let io_err = |source| TokenStoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(entries).map_err(|source| TokenStoreError::Parse {
            path: self.path.display().to_string(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        blocking_io(|| {
            let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
            Ok(self.read_all()?.remove(key))
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TokenStoreError> {
        blocking_io(|| {
            let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
            let mut entries = self.read_all()?;
            entries.insert(key.to_string(), value.to_string());
            self.write_all(&entries)
        })
    }

    fn remove(&self, key: &str) -> Result<(), TokenStoreError> {
        blocking_io(|| {
            let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
            let mut entries = self.read_all()?;
            if entries.remove(key).is_some() {
                self.write_all(&entries)?;
            }
            Ok(())
        })
    }
}

/// Runs blocking file I/O, handing the worker's other tasks off first when
/// called on a multi-threaded runtime.
fn blocking_io<T>(io: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(io)
        }
        _ => io(),
    }
}

/// Where a management token came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// Supplied by the caller, e.g. from the emailed management link.
    Explicit(String),
    /// Read back from the token store.
    Stored(String),
}

impl TokenSource {
    #[must_use]
    pub fn token(&self) -> &str {
        match self {
            Self::Explicit(t) | Self::Stored(t) => t,
        }
    }
}

/// Management-token rules over any [`TokenStore`].
///
/// Store failures are logged and otherwise ignored: a broken store must not
/// block managing an item with an explicit token.
pub struct ManagementTokens<S> {
    store: S,
}

impl<S: TokenStore> ManagementTokens<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn key(item_id: &str) -> String {
        format!("{TOKEN_KEY_PREFIX}{item_id}")
    }

    /// Picks the token to use for `item_id`: the explicit one if non-blank,
    /// else the stored one.
    #[must_use]
    pub fn resolve(&self, item_id: &str, explicit: Option<&str>) -> Option<TokenSource> {
        if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
            return Some(TokenSource::Explicit(token.to_string()));
        }
        match self.store.get(&Self::key(item_id)) {
            Ok(stored) => stored
                .filter(|t| !is_blank(t))
                .map(TokenSource::Stored),
            Err(e) => {
                tracing::warn!(item_id, error = %e, "could not read stored management token");
                None
            }
        }
    }

    /// Loads the management view of `item_id`.
    ///
    /// An accepted explicit token is remembered. A stored token rejected with
    /// 403 or 404 is forgotten and reported as expired.
    ///
    /// # Errors
    ///
    /// Returns [`RequestFailure::Validation`] when no token is available,
    /// otherwise the failure of [`ApiClient::get_item_for_management`].
    pub async fn load(
        &self,
        client: &ApiClient,
        item_id: &str,
        explicit: Option<&str>,
    ) -> Result<ManagedLostItem, RequestFailure> {
        let source = self
            .resolve(item_id, explicit)
            .ok_or_else(|| RequestFailure::validation("Management token is missing."))?;

        match client.get_item_for_management(item_id, source.token()).await {
            Ok(item) => {
                if let TokenSource::Explicit(token) = &source {
                    self.remember(item_id, token);
                }
                Ok(item)
            }
            Err(err) if matches!(source, TokenSource::Stored(_)) && matches!(err.status(), Some(403 | 404)) => {
                self.forget(item_id);
                Err(RequestFailure::validation(
                    "Invalid or expired token. Please use the link from your email again.",
                ))
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes `item_id` and forgets its token.
    ///
    /// # Errors
    ///
    /// Returns the failure of [`ApiClient::delete_item`]; the token is kept
    /// in that case.
    pub async fn delete(
        &self,
        client: &ApiClient,
        item_id: &str,
        token: &str,
    ) -> Result<(), RequestFailure> {
        client.delete_item(item_id, token).await?;
        self.forget(item_id);
        Ok(())
    }

    pub fn remember(&self, item_id: &str, token: &str) {
        match self.store.set(&Self::key(item_id), token) {
            Ok(()) => tracing::debug!(item_id, "stored management token"),
            Err(e) => tracing::warn!(item_id, error = %e, "could not store management token"),
        }
    }

    pub fn forget(&self, item_id: &str) {
        if let Err(e) = self.store.remove(&Self::key(item_id)) {
            tracing::warn!(item_id, error = %e, "could not remove management token");
        }
    }
}
