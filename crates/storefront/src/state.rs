//! Per-tab storefront session shared across UI consumers.

use trendhora_core::ItemId;
use url::Url;

use crate::cart::CartStore;
use crate::checkout::{CustomerDetails, OrderMessage};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::recently_viewed::RecentlyViewed;
use crate::storage::TabStorage;
use crate::wishlist::WishlistStore;

/// Everything one tab's UI reads and mutates: cart, wishlist and recently
/// viewed products.
///
/// Constructed once at the root of the UI tree and passed down by reference;
/// consumers that only need to react to changes hold the `watch` receivers
/// from [`CartStore::subscribe`] and [`WishlistStore::subscribe`].
#[derive(Debug)]
pub struct StorefrontSession {
    cart: CartStore,
    wishlist: WishlistStore,
    recently_viewed: RecentlyViewed,
    whatsapp_number: String,
}

impl StorefrontSession {
    /// Open a session for one tab.
    ///
    /// The cart starts empty; the wishlist is hydrated from `storage`.
    #[must_use]
    pub fn open(config: &StorefrontConfig, storage: TabStorage) -> Self {
        let wishlist = WishlistStore::open(storage.clone(), config.wishlist_key.as_str());
        let recently_viewed = RecentlyViewed::new(
            storage,
            config.recently_viewed_key.as_str(),
            config.wishlist_key.as_str(),
            config.recently_viewed_limit,
        );

        Self {
            cart: CartStore::new(),
            wishlist,
            recently_viewed,
            whatsapp_number: config.whatsapp_number.clone(),
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn recently_viewed(&self) -> &RecentlyViewed {
        &self.recently_viewed
    }

    /// Move one unit of a wishlist entry into the cart.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `item_id` is not on the wishlist.
    pub fn add_wishlist_item_to_cart(&mut self, item_id: &ItemId) -> Result<u32> {
        let entry = self
            .wishlist
            .items()
            .iter()
            .find(|entry| &entry.id == item_id)
            .ok_or_else(|| AppError::NotFound(format!("wishlist item {item_id}")))?;
        let item = entry.descriptor();
        Ok(self.wishlist.add_to_cart(&mut self.cart, &item))
    }

    /// Apply storage changes made by other tabs (or re-dispatched locally).
    pub fn sync_external(&mut self) -> bool {
        self.wishlist.sync_external()
    }

    /// Compose the WhatsApp checkout link for the current cart.
    ///
    /// # Errors
    ///
    /// Returns `Checkout` errors for an empty cart or an invalid store number.
    pub fn checkout_url(&self, customer: &CustomerDetails) -> Result<Url> {
        let message = OrderMessage::compose(self.cart.state(), customer)?;
        let url = message.whatsapp_url(&self.whatsapp_number)?;
        tracing::info!(lines = self.cart.len(), total = %self.cart.total_amount(), "Checkout link composed");
        Ok(url)
    }
}
