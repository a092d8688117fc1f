//! Item shapes shared by the cart, wishlist and recently viewed lists.
//!
//! All three serialize with the field names the storefront has always used on
//! the wire and in local storage: `_id, name, price, image, category, size,
//! itemQuantity`. Anything else a writer stores alongside them is ignored on
//! read.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::price::Price;

/// A product snapshot handed to the stores by the catalog views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    /// Available sizes; the first one is the default selection.
    #[serde(default)]
    pub size: Vec<String>,
}

impl ItemDescriptor {
    /// Create a descriptor with no image, category or sizes.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: String::new(),
            category: String::new(),
            size: Vec::new(),
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the available sizes.
    #[must_use]
    pub fn with_sizes<I, S>(mut self, sizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.size = sizes.into_iter().map(Into::into).collect();
        self
    }

    /// The default (first) size, if the item has any.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.size.first().map(String::as_str)
    }
}

/// One distinct product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: Vec<String>,
    /// Always at least 1 while the line is in the cart.
    pub item_quantity: u32,
}

impl CartLineItem {
    /// Create a line for `item` with the given quantity.
    #[must_use]
    pub fn new(item: &ItemDescriptor, quantity: NonZeroU32) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            category: item.category.clone(),
            size: item.size.clone(),
            item_quantity: quantity.get(),
        }
    }

    /// `price × itemQuantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.item_quantity)
    }

    /// The product snapshot this line was made from.
    #[must_use]
    pub fn descriptor(&self) -> ItemDescriptor {
        ItemDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            category: self.category.clone(),
            size: self.size.clone(),
        }
    }
}

/// A product the user has marked for later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default = "default_wishlist_quantity")]
    pub item_quantity: u32,
}

const fn default_wishlist_quantity() -> u32 {
    1
}

impl WishlistEntry {
    /// Create an entry for `item` with `itemQuantity = 1`.
    #[must_use]
    pub fn new(item: &ItemDescriptor) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            category: item.category.clone(),
            size: item.size.clone(),
            item_quantity: default_wishlist_quantity(),
        }
    }

    /// The product snapshot this entry was made from.
    #[must_use]
    pub fn descriptor(&self) -> ItemDescriptor {
        ItemDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            category: self.category.clone(),
            size: self.size.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn shirt() -> ItemDescriptor {
        ItemDescriptor::new("A", "Linen Shirt", Price::from(10))
            .with_image("/img/a.jpg")
            .with_category("men")
            .with_sizes(["M", "L"])
    }

    #[test]
    fn test_wishlist_entry_wire_shape() {
        let entry = WishlistEntry::new(&shirt());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": "A",
                "name": "Linen Shirt",
                "price": 10.0,
                "image": "/img/a.jpg",
                "category": "men",
                "size": ["M", "L"],
                "itemQuantity": 1
            })
        );
    }

    #[test]
    fn test_wishlist_entry_tolerates_missing_quantity_and_extra_fields() {
        let entry: WishlistEntry = serde_json::from_value(json!({
            "_id": "B",
            "name": "Scarf",
            "price": 4.5,
            "description": "written by another reader",
        }))
        .unwrap();
        assert_eq!(entry.item_quantity, 1);
        assert!(entry.size.is_empty());
        assert_eq!(entry.price, Price::from_cents(450));
    }

    #[test]
    fn test_cart_line_total() {
        let line = CartLineItem::new(&shirt(), NonZeroU32::new(3).unwrap());
        assert_eq!(line.line_total(), Price::from(30));
        assert_eq!(line.size, vec!["M".to_string(), "L".to_string()]);
    }

    #[test]
    fn test_descriptor_round_trip_through_entry() {
        let item = shirt();
        assert_eq!(WishlistEntry::new(&item).descriptor(), item);
        assert_eq!(item.default_size(), Some("M"));
    }
}
