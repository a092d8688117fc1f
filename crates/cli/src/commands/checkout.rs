//! Checkout link command.
//!
//! The cart is session-only, so it is rebuilt from a JSON file holding an
//! array of cart lines (`_id, name, price, image, category, size,
//! itemQuantity`). Lines repeating an ID merge into one.

use std::num::NonZeroU32;
use std::path::Path;

use tracing::{info, warn};
use trendhora_core::CartLineItem;
use trendhora_storefront::StorefrontSession;
use trendhora_storefront::checkout::CustomerDetails;
use trendhora_storefront::error::AppError;

use super::{CommandError, emit_line};

/// Customer fields from the command line.
#[derive(Debug)]
pub struct CustomerArgs {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Parse cart lines from JSON.
///
/// # Errors
///
/// Returns `Json` if the input is not an array of cart lines.
pub fn parse_cart(json: &str) -> Result<Vec<CartLineItem>, CommandError> {
    Ok(serde_json::from_str(json)?)
}

/// Fill the session cart from `lines`, skipping zero quantities.
pub fn fill_cart(session: &mut StorefrontSession, lines: &[CartLineItem]) {
    for line in lines {
        let Some(quantity) = NonZeroU32::new(line.item_quantity) else {
            warn!(item = %line.id, "Skipping cart line with zero quantity");
            continue;
        };
        session.cart_mut().add_item(&line.descriptor(), quantity);
    }
}

/// Print the WhatsApp link for the cart in `cart_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if checkout
/// validation fails.
pub async fn run(
    session: &mut StorefrontSession,
    cart_path: &Path,
    customer: &CustomerArgs,
) -> Result<(), CommandError> {
    let json = tokio::fs::read_to_string(cart_path)
        .await
        .map_err(|source| CommandError::Read {
            path: cart_path.display().to_string(),
            source,
        })?;
    let lines = parse_cart(&json)?;
    fill_cart(session, &lines);
    info!(
        lines = session.cart().len(),
        total = %session.cart().total_amount(),
        "Loaded cart"
    );

    let details = CustomerDetails::new(&customer.name, &customer.phone)
        .and_then(|d| d.with_email(&customer.email))
        .map_err(AppError::from)?
        .with_address(&customer.address);

    let url = session.checkout_url(&details)?;
    emit_line(url.as_str());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use trendhora_core::Price;
    use trendhora_storefront::config::StorefrontConfig;
    use trendhora_storefront::storage::SharedStorage;

    use super::*;

    #[test]
    fn test_fill_cart_merges_and_skips_zero() {
        let lines = parse_cart(
            r#"[
                {"_id": "A", "name": "Shirt", "price": 10, "size": ["M"], "itemQuantity": 2},
                {"_id": "B", "name": "Cap", "price": 5.5, "itemQuantity": 0},
                {"_id": "A", "name": "Shirt", "price": 10, "itemQuantity": 3}
            ]"#,
        )
        .unwrap();

        let shared = SharedStorage::in_memory();
        let mut session = StorefrontSession::open(&StorefrontConfig::default(), shared.open_tab());
        fill_cart(&mut session, &lines);

        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.cart().items()[0].item_quantity, 5);
        assert_eq!(session.cart().total_amount(), Price::from(50));
    }

    #[test]
    fn test_parse_cart_rejects_non_array() {
        assert!(matches!(
            parse_cart(r#"{"_id": "A"}"#),
            Err(CommandError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_run_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let shared = SharedStorage::in_memory();
        let mut session = StorefrontSession::open(&StorefrontConfig::default(), shared.open_tab());
        let customer = CustomerArgs {
            name: "Asha".into(),
            phone: "98765".into(),
            email: String::new(),
            address: String::new(),
        };

        let err = run(&mut session, &dir.path().join("missing.json"), &customer)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Read { .. }));
    }
}
