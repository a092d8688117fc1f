//! Checkout via WhatsApp.
//!
//! Orders are not placed through the API; the cart is turned into a
//! pre-filled WhatsApp message to the store's number and the customer sends it
//! from their own account.

use std::fmt::Write as _;

use thiserror::Error;
use trendhora_core::{Email, EmailError};
use url::Url;

use crate::cart::CartState;

/// Checkout validation errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Customer name is required")]
    MissingName,

    #[error("Customer phone number is required")]
    MissingPhone,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid WhatsApp number: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid checkout URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Contact details collected by the checkout form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    name: String,
    phone: String,
    email: Option<Email>,
    address: Option<String>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl CustomerDetails {
    /// Validate the required fields.
    ///
    /// # Errors
    ///
    /// Returns `MissingName` or `MissingPhone` when either is blank.
    pub fn new(name: &str, phone: &str) -> Result<Self, CheckoutError> {
        Ok(Self {
            name: non_blank(name).ok_or(CheckoutError::MissingName)?,
            phone: non_blank(phone).ok_or(CheckoutError::MissingPhone)?,
            email: None,
            address: None,
        })
    }

    /// Attach an email address; blank input leaves it unset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` if non-blank input is not an address.
    pub fn with_email(mut self, email: &str) -> Result<Self, CheckoutError> {
        self.email = non_blank(email).map(|e| Email::parse(&e)).transpose()?;
        Ok(self)
    }

    /// Attach a delivery address; blank input leaves it unset.
    #[must_use]
    pub fn with_address(mut self, address: &str) -> Self {
        self.address = non_blank(address);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// The text of an order message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderMessage(String);

impl OrderMessage {
    /// Compose the message for `cart` and `customer`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` if the cart has no lines.
    pub fn compose(cart: &CartState, customer: &CustomerDetails) -> Result<Self, CheckoutError> {
        if cart.items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut text = String::from("🛍️ *New Order from Trendhora*\n\n📋 *Order Details:*\n");
        for (i, line) in cart.items.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            let size = line.size.first().map_or("N/A", String::as_str);
            let _ = write!(
                text,
                "• {} - Size: {} - ${} (Qty: {})",
                line.name, size, line.price, line.item_quantity
            );
        }

        let not_provided = "Not provided";
        let _ = write!(
            text,
            "\n\n💰 *Total: ${}*\n\n👤 *Customer Details:*\n📞 Name: {}\n📱 Phone: {}\n📧 Email: {}\n📍 Address: {}\n\nPlease confirm this order!",
            cart.total_amount.to_fixed(),
            customer.name,
            customer.phone,
            customer.email.as_ref().map_or(not_provided, Email::as_str),
            customer.address.as_deref().unwrap_or(not_provided),
        );

        Ok(Self(text))
    }

    /// The message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `https://wa.me/<number>?text=<message>` for the store's number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidNumber` unless `number` is all digits.
    pub fn whatsapp_url(&self, number: &str) -> Result<Url, CheckoutError> {
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::InvalidNumber(number.to_owned()));
        }
        let url = Url::parse(&format!(
            "https://wa.me/{number}?text={}",
            urlencoding::encode(&self.0)
        ))?;
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use trendhora_core::{ItemDescriptor, Price};

    use super::*;
    use crate::cart::CartStore;

    fn cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add_item(
            &ItemDescriptor::new("A", "Denim Jacket", Price::from_cents(4999)).with_sizes(["M"]),
            NonZeroU32::new(2).unwrap(),
        );
        cart.add_item(
            &ItemDescriptor::new("B", "Tote", Price::from(12)),
            NonZeroU32::new(1).unwrap(),
        );
        cart
    }

    #[test]
    fn test_customer_requires_name_and_phone() {
        assert!(matches!(
            CustomerDetails::new("  ", "123"),
            Err(CheckoutError::MissingName)
        ));
        assert!(matches!(
            CustomerDetails::new("Asha", ""),
            Err(CheckoutError::MissingPhone)
        ));
        let customer = CustomerDetails::new(" Asha ", "98765").unwrap();
        assert_eq!(customer.name(), "Asha");
    }

    #[test]
    fn test_optional_fields() {
        let customer = CustomerDetails::new("Asha", "98765")
            .unwrap()
            .with_email("")
            .unwrap()
            .with_address("  ");
        assert!(customer.email().is_none());
        assert!(customer.address().is_none());

        assert!(matches!(
            CustomerDetails::new("Asha", "98765").unwrap().with_email("nope"),
            Err(CheckoutError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_message_lists_lines_and_quantity_aware_total() {
        let customer = CustomerDetails::new("Asha", "98765").unwrap();
        let message = OrderMessage::compose(cart().state(), &customer).unwrap();
        let text = message.as_str();

        assert!(text.contains("• Denim Jacket - Size: M - $49.99 (Qty: 2)"));
        assert!(text.contains("• Tote - Size: N/A - $12 (Qty: 1)"));
        assert!(text.contains("💰 *Total: $111.98*"));
        assert!(text.contains("📧 Email: Not provided"));
        assert!(text.ends_with("Please confirm this order!"));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let customer = CustomerDetails::new("Asha", "98765").unwrap();
        assert!(matches!(
            OrderMessage::compose(CartStore::new().state(), &customer),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_whatsapp_url() {
        let customer = CustomerDetails::new("Asha", "98765")
            .unwrap()
            .with_email("asha@example.com")
            .unwrap();
        let message = OrderMessage::compose(cart().state(), &customer).unwrap();

        let url = message.whatsapp_url("919876543210").unwrap();
        assert_eq!(url.host_str(), Some("wa.me"));
        assert_eq!(url.path(), "/919876543210");
        let text = url
            .query_pairs()
            .find(|(k, _)| k == "text")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(text, message.as_str());

        assert!(matches!(
            message.whatsapp_url("+91 98"),
            Err(CheckoutError::InvalidNumber(_))
        ));
    }
}
