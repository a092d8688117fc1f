//! Integration tests for TrendHora.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p trendhora-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart merge, clamp and total behaviour
//! - `cross_tab_wishlist` - Wishlist persistence and tab synchronization
//! - `recently_viewed` - Recently viewed strip feeding the wishlist
//!
//! This library only holds fixtures shared by the test files.

use std::num::NonZeroU32;

use trendhora_core::{ItemDescriptor, Price};
use trendhora_storefront::StorefrontSession;
use trendhora_storefront::config::StorefrontConfig;
use trendhora_storefront::storage::SharedStorage;

/// A catalog item priced in whole currency units.
#[must_use]
pub fn item(id: &str, price: u32) -> ItemDescriptor {
    ItemDescriptor::new(id, format!("Product {id}"), Price::from(price))
        .with_image(format!("https://cdn.trendhora.test/{id}.jpg"))
        .with_category("women")
        .with_sizes(["S", "M", "L"])
}

/// A positive quantity.
///
/// # Panics
///
/// Panics if `n` is zero.
#[must_use]
pub fn qty(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap_or_else(|| panic!("quantity must be positive"))
}

/// Open a session for a new tab on `shared`.
#[must_use]
pub fn open_session(shared: &SharedStorage) -> StorefrontSession {
    StorefrontSession::open(&StorefrontConfig::default(), shared.open_tab())
}
