//! Durable wishlist, kept consistent across tabs.
//!
//! The full entry list is written to storage after every change. Other tabs
//! writing the same key replace this tab's list wholesale the next time
//! [`WishlistStore::sync_external`] runs; there is no merging, the last
//! writer wins. A sync always adopts what storage holds at that moment, not
//! the value carried by the queued event, so a tab that wrote after the
//! event was queued keeps its own (newer) list.

use std::collections::HashSet;
use std::num::NonZeroU32;

use tokio::sync::watch;
use trendhora_core::{ItemDescriptor, ItemId, ToggleOutcome, WishlistEntry};

use crate::cart::CartStore;
use crate::storage::{StorageError, StorageEvent, Subscription, TabStorage};

/// One tab's wishlist.
#[derive(Debug)]
pub struct WishlistStore {
    storage: TabStorage,
    key: String,
    entries: Vec<WishlistEntry>,
    subscription: Subscription,
    watchers: watch::Sender<Vec<WishlistEntry>>,
    persist_warning: Option<StorageError>,
}

impl WishlistStore {
    /// Hydrate from `key` and start observing writes from other tabs.
    ///
    /// A missing or malformed stored value yields an empty wishlist.
    #[must_use]
    pub fn open(storage: TabStorage, key: impl Into<String>) -> Self {
        let key = key.into();
        // Register before reading so a write landing in between is not lost.
        let subscription = storage.subscribe(&key);
        let entries = unique_by_id(storage.load_list(&key));
        tracing::debug!(tab = %storage.id(), key, entries = entries.len(), "Wishlist hydrated");

        let (watchers, _) = watch::channel(entries.clone());
        Self {
            storage,
            key,
            entries,
            subscription,
            watchers,
            persist_warning: None,
        }
    }

    /// Add `item` with quantity 1.
    ///
    /// An item already on the wishlist is not added a second time.
    pub fn add_item(&mut self, item: &ItemDescriptor) -> ToggleOutcome {
        if self.contains(&item.id) {
            tracing::debug!(item = %item.id, "Wishlist add skipped, already present");
        } else {
            self.entries.push(WishlistEntry::new(item));
            tracing::debug!(item = %item.id, "Wishlist add");
        }
        self.commit();
        ToggleOutcome::Added
    }

    /// Remove the entry for `item_id`.
    pub fn remove_item(&mut self, item_id: &ItemId) -> ToggleOutcome {
        self.entries.retain(|entry| &entry.id != item_id);
        tracing::debug!(item = %item_id, "Wishlist remove");
        self.commit();
        ToggleOutcome::Removed
    }

    /// Remove `item` if present, add it otherwise.
    pub fn toggle_item(&mut self, item: &ItemDescriptor) -> ToggleOutcome {
        if self.contains(&item.id) {
            self.remove_item(&item.id)
        } else {
            self.add_item(item)
        }
    }

    /// Put one unit of `item` in `cart`. The wishlist is left unchanged.
    ///
    /// Returns the cart quantity of the item afterwards.
    #[allow(clippy::unused_self)] // part of the wishlist's consumer-facing surface
    pub fn add_to_cart(&self, cart: &mut CartStore, item: &ItemDescriptor) -> u32 {
        cart.add_item(item, NonZeroU32::MIN)
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[WishlistEntry] {
        &self.entries
    }

    /// Whether `item_id` is on the wishlist.
    #[must_use]
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.entries.iter().any(|entry| &entry.id == item_id)
    }

    /// Number of entries (the wishlist badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The storage key this wishlist persists under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Watch the wishlist; the receiver sees every committed or synced list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<WishlistEntry>> {
        self.watchers.subscribe()
    }

    /// Take the warning left by the last failed write, if any.
    ///
    /// A failed write never rolls back the in-memory list; the change stays
    /// visible in this tab and the warning is kept here until taken.
    pub fn take_persist_warning(&mut self) -> Option<StorageError> {
        self.persist_warning.take()
    }

    /// Apply writes made to the wishlist key by other tabs.
    ///
    /// Only the most recent queued change matters since each one replaces
    /// the whole list. Returns whether anything was applied.
    pub fn sync_external(&mut self) -> bool {
        match self.subscription.latest() {
            Some(event) => {
                self.apply_external(&event);
                true
            }
            None => false,
        }
    }

    /// Wait for the next external change and apply it (together with any
    /// that queued up behind it).
    ///
    /// Returns `false` once the storage has gone away.
    pub async fn next_external_change(&mut self) -> bool {
        let Some(first) = self.subscription.next().await else {
            return false;
        };
        let event = self.subscription.latest().unwrap_or(first);
        self.apply_external(&event);
        true
    }

    fn apply_external(&mut self, event: &StorageEvent) {
        self.entries = unique_by_id(self.storage.load_list(&self.key));
        tracing::debug!(
            key = %self.key,
            source = %event.source,
            entries = self.entries.len(),
            "Wishlist replaced by external write"
        );
        self.watchers.send_replace(self.entries.clone());
    }

    fn commit(&mut self) {
        self.watchers.send_replace(self.entries.clone());
        if let Err(e) = self.storage.save_list(&self.key, &self.entries) {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist wishlist");
            self.persist_warning = Some(e);
        }
    }
}

/// Drop repeated IDs written by other readers, keeping the first entry.
fn unique_by_id(mut entries: Vec<WishlistEntry>) -> Vec<WishlistEntry> {
    let mut seen = HashSet::new();
    let before = entries.len();
    entries.retain(|entry| seen.insert(entry.id.clone()));
    if entries.len() != before {
        tracing::warn!(dropped = before - entries.len(), "Dropped duplicate wishlist entries");
    }
    entries
}
