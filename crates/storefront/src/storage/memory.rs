//! Process-local storage backend.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Backend, StorageError};

/// In-memory key/value backend.
///
/// An optional quota caps the total size (keys plus values, in bytes) the
/// way browsers cap local storage per origin.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryBackend {
    /// Backend without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that rejects writes once the stored total would exceed
    /// `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(quota),
        }
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn replace(&self, key: &str, value: Option<&str>) -> Result<Option<String>, StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;

        let Some(value) = value else {
            return Ok(entries.remove(key));
        };

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    limit,
                });
            }
        }

        Ok(entries.insert(key.to_owned(), value.to_owned()))
    }
}
