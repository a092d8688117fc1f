//! Core types for TrendHora.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod item;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use item::{CartLineItem, ItemDescriptor, WishlistEntry};
pub use price::Price;
pub use status::*;
