//! Recently viewed commands.

use tracing::info;
use trendhora_core::{ItemDescriptor, ItemId};
use trendhora_storefront::StorefrontSession;
use trendhora_storefront::error::AppError;
use trendhora_storefront::recently_viewed::WishlistAddOutcome;

use super::{CommandError, ItemArgs, emit, emit_line};

/// Print recently viewed products, newest first.
///
/// # Errors
///
/// Returns an error if the list cannot be encoded.
pub fn list(session: &StorefrontSession) -> Result<(), CommandError> {
    emit(&session.recently_viewed().items())
}

/// Record a product view.
///
/// # Errors
///
/// Returns `Storage` if the list cannot be written.
pub fn view(session: &StorefrontSession, item: ItemArgs) -> Result<(), CommandError> {
    let item = ItemDescriptor::from(item);
    session.recently_viewed().record_view(&item)?;
    info!(item = %item.id, "Recorded view");
    Ok(())
}

/// Copy a recently viewed product to the wishlist.
///
/// # Errors
///
/// Returns `NotFound` if the product is not in the recently viewed list, or
/// `Storage` if the wishlist cannot be written.
pub fn to_wishlist(session: &mut StorefrontSession, id: &str) -> Result<(), CommandError> {
    let id = ItemId::from(id);
    let item = session
        .recently_viewed()
        .items()
        .into_iter()
        .find(|item| item.id == id)
        .ok_or_else(|| AppError::NotFound(format!("recently viewed item {id}")))?;

    let outcome = session.recently_viewed().add_to_wishlist(&item)?;
    // the write was re-dispatched to this tab; fold it into the session
    session.sync_external();

    match outcome {
        WishlistAddOutcome::Added => {
            info!(item = %id, entries = session.wishlist().len(), "Added to wishlist");
            emit_line("added");
        }
        WishlistAddOutcome::AlreadyPresent => {
            info!(item = %id, "Item already in wishlist");
            emit_line("already present");
        }
    }
    Ok(())
}
