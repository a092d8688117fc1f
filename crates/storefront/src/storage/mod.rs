//! Local persistence adapter.
//!
//! Models the browser's per-origin key/value storage: one [`SharedStorage`]
//! per origin holds the data and the observer registry, and every open tab
//! gets its own [`TabStorage`] handle onto it.
//!
//! # Notifications
//!
//! Writes behave like the native storage event:
//!
//! - A write through one tab notifies observers registered by every *other*
//!   tab on the same key.
//! - The writing tab is not notified. A component that needs same-tab
//!   observers to pick up a programmatic write calls
//!   [`TabStorage::dispatch_local`] afterwards.
//!
//! Observers are registered with [`TabStorage::subscribe`], which returns a
//! [`Subscription`]. Events queue on the subscription until the owner drains
//! them, so they are always applied between operations and never in the
//! middle of one. Dropping the subscription unregisters it.
//!
//! # Backends
//!
//! - [`MemoryBackend`] - process-local, optionally with a byte quota
//! - [`FileBackend`] - one JSON file per key under a directory

mod file;
mod memory;
mod observer;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use observer::{StorageEvent, Subscription};

use observer::ObserverRegistry;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key cannot be mapped onto the backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Write would exceed the backend's byte quota.
    #[error("Quota exceeded writing {key}: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// A previous writer panicked while holding the backend lock.
    #[error("Storage backend lock poisoned")]
    Poisoned,
}

/// Raw key/value store shared by every tab of an origin.
pub trait Backend: Send + Sync + fmt::Debug {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key` (or delete the key when `None`) and return
    /// the previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write is rejected. The previous value
    /// is left in place in that case.
    fn replace(&self, key: &str, value: Option<&str>) -> Result<Option<String>, StorageError>;
}

/// Identifier of one open tab (storage handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(Uuid);

impl TabId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storage shared by all tabs of one origin.
///
/// Cheap to clone; clones refer to the same data and observers.
#[derive(Debug, Clone)]
pub struct SharedStorage {
    backend: Arc<dyn Backend>,
    observers: Arc<ObserverRegistry>,
}

impl SharedStorage {
    /// Wrap an existing backend.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            observers: Arc::new(ObserverRegistry::default()),
        }
    }

    /// Process-local storage with no quota.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// File-backed storage rooted at `dir` (created if missing).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn on_disk(dir: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        Ok(Self::new(Arc::new(FileBackend::open(dir)?)))
    }

    /// Open a new tab handle onto this storage.
    #[must_use]
    pub fn open_tab(&self) -> TabStorage {
        let tab = TabStorage {
            id: TabId::new(),
            shared: self.clone(),
        };
        tracing::debug!(tab = %tab.id, "Opened storage tab");
        tab
    }
}

/// One tab's view of the shared storage.
#[derive(Debug, Clone)]
pub struct TabStorage {
    id: TabId,
    shared: SharedStorage,
}

impl TabStorage {
    /// This handle's tab ID.
    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.shared.backend.read(key)
    }

    /// Write `value` under `key` and notify other tabs.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write; no
    /// notification is sent in that case.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.replace(key, Some(value))
    }

    /// Delete `key` and notify other tabs.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.replace(key, None)
    }

    fn replace(&self, key: &str, value: Option<&str>) -> Result<(), StorageError> {
        let old_value = self.shared.backend.replace(key, value)?;
        if old_value.as_deref() == value {
            return Ok(());
        }

        let event = StorageEvent {
            key: key.to_owned(),
            old_value,
            new_value: value.map(str::to_owned),
            source: self.id,
        };
        let delivered = self.shared.observers.notify_others(&event);
        tracing::debug!(tab = %self.id, key, delivered, "Storage write");
        Ok(())
    }

    /// Register an observer for changes to `key` made by other tabs (and by
    /// this tab's [`dispatch_local`](Self::dispatch_local)).
    #[must_use]
    pub fn subscribe(&self, key: &str) -> Subscription {
        self.shared.observers.register(self.id, key)
    }

    /// Re-dispatch the current value of `key` to this tab's own observers.
    ///
    /// Returns the number of observers notified.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the current value cannot be read.
    pub fn dispatch_local(&self, key: &str) -> Result<usize, StorageError> {
        let current = self.get_item(key)?;
        let event = StorageEvent {
            key: key.to_owned(),
            old_value: None,
            new_value: current,
            source: self.id,
        };
        Ok(self.shared.observers.notify_tab(&event))
    }

    /// Read and decode the JSON list under `key`.
    ///
    /// Absent, unreadable or malformed values decode to an empty list.
    #[must_use]
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.get_item(key) {
            Ok(raw) => decode_list(key, raw.as_deref()),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored list");
                Vec::new()
            }
        }
    }

    /// Encode `items` as a JSON array and write it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub fn save_list<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(items)?;
        self.set_item(key, &json)
    }
}

// Decode a stored JSON list, treating absent or malformed input as empty.
#[must_use]
fn decode_list<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed stored list");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_notifies_other_tabs_only() {
        let shared = SharedStorage::in_memory();
        let writer = shared.open_tab();
        let reader = shared.open_tab();

        let mut own = writer.subscribe("wishlist");
        let mut other = reader.subscribe("wishlist");

        writer.set_item("wishlist", "[]").unwrap();

        let event = other.try_next().unwrap();
        assert_eq!(event.key, "wishlist");
        assert_eq!(event.old_value, None);
        assert_eq!(event.new_value.as_deref(), Some("[]"));
        assert_eq!(event.source, writer.id());
        assert!(own.try_next().is_none());
    }

    #[test]
    fn test_observers_filter_by_key() {
        let shared = SharedStorage::in_memory();
        let writer = shared.open_tab();
        let mut sub = shared.open_tab().subscribe("wishlist");

        writer.set_item("recentlyViewed", "[]").unwrap();
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_unchanged_write_is_silent() {
        let shared = SharedStorage::in_memory();
        let writer = shared.open_tab();
        let mut sub = shared.open_tab().subscribe("k");

        writer.set_item("k", "v").unwrap();
        writer.set_item("k", "v").unwrap();
        assert!(sub.try_next().is_some());
        assert!(sub.try_next().is_none());
    }

    #[test]
    fn test_remove_item_notifies_with_none() {
        let shared = SharedStorage::in_memory();
        let writer = shared.open_tab();
        writer.set_item("k", "v").unwrap();
        let mut sub = shared.open_tab().subscribe("k");

        writer.remove_item("k").unwrap();
        let event = sub.try_next().unwrap();
        assert_eq!(event.old_value.as_deref(), Some("v"));
        assert_eq!(event.new_value, None);
        assert_eq!(writer.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_dispatch_local_reaches_same_tab() {
        let shared = SharedStorage::in_memory();
        let tab = shared.open_tab();
        let other = shared.open_tab();
        let mut own = tab.subscribe("k");
        let mut foreign = other.subscribe("k");

        tab.set_item("k", "v").unwrap();
        assert!(own.try_next().is_none());
        // the native-style write already reached the other tab
        assert!(foreign.try_next().is_some());

        assert_eq!(tab.dispatch_local("k").unwrap(), 1);
        assert_eq!(own.try_next().unwrap().new_value.as_deref(), Some("v"));
        assert!(foreign.try_next().is_none());
    }

    #[test]
    fn test_dropped_subscription_unregisters() {
        let shared = SharedStorage::in_memory();
        let writer = shared.open_tab();
        let sub = shared.open_tab().subscribe("k");
        assert_eq!(shared.observers.len(), 1);

        drop(sub);
        assert_eq!(shared.observers.len(), 0);
        writer.set_item("k", "v").unwrap();
    }

    #[test]
    fn test_load_list_degrades_to_empty() {
        let shared = SharedStorage::in_memory();
        let tab = shared.open_tab();

        let missing: Vec<u32> = tab.load_list("k");
        assert!(missing.is_empty());

        tab.set_item("k", "{not json").unwrap();
        let malformed: Vec<u32> = tab.load_list("k");
        assert!(malformed.is_empty());

        tab.save_list("k", &[1_u32, 2, 3]).unwrap();
        assert_eq!(tab.load_list::<u32>("k"), vec![1, 2, 3]);
    }

    #[test]
    fn test_failed_write_sends_nothing() {
        let shared = SharedStorage::new(Arc::new(MemoryBackend::with_quota(4)));
        let writer = shared.open_tab();
        let mut sub = shared.open_tab().subscribe("k");

        let err = writer.set_item("k", "too long").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert!(sub.try_next().is_none());
        assert_eq!(writer.get_item("k").unwrap(), None);
    }
}
