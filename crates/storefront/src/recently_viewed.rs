//! Recently viewed products.
//!
//! A short most-recent-first list of product snapshots persisted under its own
//! key. Product pages record views here, and the "recently viewed" strip can
//! send an item straight to the wishlist by writing the wishlist key directly.

use trendhora_core::{ItemDescriptor, ItemId, WishlistEntry};

use crate::storage::{StorageError, TabStorage};

/// Default number of products kept.
pub const DEFAULT_LIMIT: usize = 5;

/// Outcome of [`RecentlyViewed::add_to_wishlist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAddOutcome {
    Added,
    /// An entry with the same ID or the same name is already stored.
    AlreadyPresent,
}

/// Reader/writer for the recently viewed list of one tab.
#[derive(Debug, Clone)]
pub struct RecentlyViewed {
    storage: TabStorage,
    key: String,
    wishlist_key: String,
    limit: usize,
}

impl RecentlyViewed {
    /// Create a reader/writer over `key`, sending wishlist additions to
    /// `wishlist_key`. A `limit` of zero is treated as one.
    #[must_use]
    pub fn new(
        storage: TabStorage,
        key: impl Into<String>,
        wishlist_key: impl Into<String>,
        limit: usize,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
            wishlist_key: wishlist_key.into(),
            limit: limit.max(1),
        }
    }

    /// Record that `item` was viewed: move it to the front and trim the list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be written.
    pub fn record_view(&self, item: &ItemDescriptor) -> Result<(), StorageError> {
        let mut viewed: Vec<ItemDescriptor> = self.storage.load_list(&self.key);
        viewed.retain(|seen| seen.id != item.id);
        viewed.insert(0, item.clone());
        viewed.truncate(self.limit);

        tracing::debug!(item = %item.id, entries = viewed.len(), "Recorded product view");
        self.storage.save_list(&self.key, &viewed)
    }

    /// The stored list, newest first, at most `limit` long.
    #[must_use]
    pub fn items(&self) -> Vec<ItemDescriptor> {
        let mut viewed: Vec<ItemDescriptor> = self.storage.load_list(&self.key);
        viewed.truncate(self.limit);
        viewed
    }

    /// Look up a viewed product by ID and category (used to render a product
    /// page without refetching it).
    #[must_use]
    pub fn find(&self, item_id: &ItemId, category: &str) -> Option<ItemDescriptor> {
        self.storage
            .load_list::<ItemDescriptor>(&self.key)
            .into_iter()
            .find(|item| &item.id == item_id && item.category == category)
    }

    /// Append `item` to the stored wishlist unless an entry with the same ID
    /// or name is already there.
    ///
    /// This writes the wishlist key directly rather than going through a
    /// [`WishlistStore`](crate::wishlist::WishlistStore), so it re-dispatches
    /// the change locally: the native-style notification only reaches other
    /// tabs.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the wishlist cannot be written or re-read.
    pub fn add_to_wishlist(&self, item: &ItemDescriptor) -> Result<WishlistAddOutcome, StorageError> {
        let mut wishlist: Vec<WishlistEntry> = self.storage.load_list(&self.wishlist_key);
        if wishlist
            .iter()
            .any(|entry| entry.id == item.id || entry.name == item.name)
        {
            tracing::debug!(item = %item.id, "Recently viewed item already on wishlist");
            return Ok(WishlistAddOutcome::AlreadyPresent);
        }

        wishlist.push(WishlistEntry::new(item));
        self.storage.save_list(&self.wishlist_key, &wishlist)?;
        let notified = self.storage.dispatch_local(&self.wishlist_key)?;
        tracing::debug!(item = %item.id, notified, "Added recently viewed item to wishlist");
        Ok(WishlistAddOutcome::Added)
    }
}
