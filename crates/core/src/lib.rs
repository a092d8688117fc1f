//! TrendHora Core - Shared types library.
//!
//! This crate provides common types used across all TrendHora components:
//! - `storefront` - Client-local cart, wishlist and recently viewed state
//! - `cli` - Command-line tools for inspecting and editing persisted state
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! observers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for item IDs, prices, emails, item shapes and
//!   store status tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
