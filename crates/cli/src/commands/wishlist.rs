//! Wishlist commands.
//!
//! Every mutation goes through [`WishlistStore`](trendhora_storefront::WishlistStore),
//! so the file on disk is rewritten with the full list each time.

use tracing::{info, warn};
use trendhora_core::{ItemDescriptor, ItemId, ToggleOutcome};
use trendhora_storefront::StorefrontSession;

use super::{CommandError, ItemArgs, emit, emit_line};

/// Print the wishlist.
///
/// # Errors
///
/// Returns an error if the list cannot be encoded.
pub fn list(session: &StorefrontSession) -> Result<(), CommandError> {
    emit(&session.wishlist().items())
}

/// Add an item.
///
/// # Errors
///
/// Returns `Storage` if the updated wishlist could not be written.
pub fn add(session: &mut StorefrontSession, item: ItemArgs) -> Result<(), CommandError> {
    let item = ItemDescriptor::from(item);
    let outcome = session.wishlist_mut().add_item(&item);
    finish(session, &item.id, outcome)
}

/// Remove an item by ID.
///
/// # Errors
///
/// Returns `Storage` if the updated wishlist could not be written.
pub fn remove(session: &mut StorefrontSession, id: &str) -> Result<(), CommandError> {
    let id = ItemId::from(id);
    if !session.wishlist().contains(&id) {
        warn!(item = %id, "Item is not on the wishlist");
    }
    let outcome = session.wishlist_mut().remove_item(&id);
    finish(session, &id, outcome)
}

/// Toggle an item.
///
/// # Errors
///
/// Returns `Storage` if the updated wishlist could not be written.
pub fn toggle(session: &mut StorefrontSession, item: ItemArgs) -> Result<(), CommandError> {
    let item = ItemDescriptor::from(item);
    let outcome = session.wishlist_mut().toggle_item(&item);
    finish(session, &item.id, outcome)
}

// The in-memory change always succeeds; only the write can fail, and a CLI
// run has no later chance to retry it.
fn finish(
    session: &mut StorefrontSession,
    id: &ItemId,
    outcome: ToggleOutcome,
) -> Result<(), CommandError> {
    if let Some(e) = session.wishlist_mut().take_persist_warning() {
        return Err(e.into());
    }
    info!(item = %id, %outcome, entries = session.wishlist().len(), "Wishlist updated");
    emit_line(outcome.as_str());
    Ok(())
}
