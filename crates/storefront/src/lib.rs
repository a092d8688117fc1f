//! TrendHora Storefront library.
//!
//! Client-local state behind the storefront UI: an in-session cart, a
//! wishlist persisted to local storage and kept in sync across tabs, the
//! recently viewed strip, and WhatsApp checkout links.
//!
//! # Modules
//!
//! - [`storage`] - Local persistence adapter with cross-tab notifications
//! - [`cart`] - Cart store with quantity merging and derived total
//! - [`wishlist`] - Durable wishlist store with toggle semantics
//! - [`recently_viewed`] - Most-recent-first viewed products
//! - [`checkout`] - Order message and WhatsApp link composition
//! - [`state`] - Per-tab session tying the stores together
//! - [`config`] - Environment-based configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod recently_viewed;
pub mod state;
pub mod storage;
pub mod wishlist;

pub use cart::{CartState, CartStore};
pub use state::StorefrontSession;
pub use wishlist::WishlistStore;
