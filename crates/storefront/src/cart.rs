//! In-session shopping cart.
//!
//! The cart lives only as long as the session that owns it; nothing here is
//! persisted. Adding an item that is already in the cart merges quantities
//! into the existing line instead of creating a second one, and the total is
//! recomputed from the lines after every change.

use std::num::NonZeroU32;

use serde::Serialize;
use tokio::sync::watch;
use trendhora_core::{CartLineItem, ItemDescriptor, ItemId, Price, QuantityAction};

/// Snapshot of the cart: lines in insertion order plus the derived total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub items: Vec<CartLineItem>,
    /// Always `Σ price × itemQuantity` over `items`.
    pub total_amount: Price,
}

impl CartState {
    fn recompute_total(&mut self) {
        self.total_amount = self.items.iter().map(CartLineItem::line_total).sum();
    }
}

/// Authoritative cart for one session.
#[derive(Debug)]
pub struct CartStore {
    state: CartState,
    watchers: watch::Sender<CartState>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (watchers, _) = watch::channel(CartState::default());
        Self {
            state: CartState::default(),
            watchers,
        }
    }

    /// Add `quantity` of `item`, merging into an existing line with the same
    /// ID.
    ///
    /// Returns the item's quantity after the merge.
    pub fn add_item(&mut self, item: &ItemDescriptor, quantity: NonZeroU32) -> u32 {
        let updated = if let Some(line) = self.line_mut(&item.id) {
            line.item_quantity = line.item_quantity.saturating_add(quantity.get());
            line.item_quantity
        } else {
            self.state.items.push(CartLineItem::new(item, quantity));
            quantity.get()
        };

        tracing::debug!(item = %item.id, added = quantity.get(), quantity = updated, "Cart add");
        self.commit();
        updated
    }

    /// Remove the line for `item_id`. Unknown IDs are ignored.
    pub fn remove_item(&mut self, item_id: &ItemId) {
        let before = self.state.items.len();
        self.state.items.retain(|line| &line.id != item_id);
        if self.state.items.len() != before {
            tracing::debug!(item = %item_id, "Cart remove");
            self.commit();
        }
    }

    /// Step the quantity of `item_id` up or down by one.
    ///
    /// Decrements stop at 1; taking a line out of the cart is
    /// [`remove_item`](Self::remove_item)'s job. Unknown IDs are ignored.
    pub fn quantity(&mut self, item_id: &ItemId, action: QuantityAction) {
        let Some(line) = self.line_mut(item_id) else {
            return;
        };

        let next = match action {
            QuantityAction::Inc => line.item_quantity.saturating_add(1),
            QuantityAction::Dec => line.item_quantity.saturating_sub(1).max(1),
        };
        if next == line.item_quantity {
            return;
        }
        line.item_quantity = next;

        tracing::debug!(item = %item_id, action = action.as_str(), quantity = next, "Cart quantity");
        self.commit();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.state.items.clear();
        tracing::debug!("Cart cleared");
        self.commit();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    /// The line for `item_id`, if present.
    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> Option<&CartLineItem> {
        self.state.items.iter().find(|line| &line.id == item_id)
    }

    /// `Σ price × itemQuantity` over all lines.
    #[must_use]
    pub const fn total_amount(&self) -> Price {
        self.state.total_amount
    }

    /// Number of distinct lines (the cart badge count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.state
            .items
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.item_quantity))
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Watch the cart; the receiver sees a fresh snapshot after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.watchers.subscribe()
    }

    fn line_mut(&mut self, item_id: &ItemId) -> Option<&mut CartLineItem> {
        self.state.items.iter_mut().find(|line| &line.id == item_id)
    }

    fn commit(&mut self) {
        self.state.recompute_total();
        self.watchers.send_replace(self.state.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn item(id: &str, cents: i64) -> ItemDescriptor {
        ItemDescriptor::new(id, format!("Item {id}"), Price::from_cents(cents))
    }

    fn expected_total(cart: &CartStore) -> Price {
        cart.items()
            .iter()
            .map(|line| line.price.times(line.item_quantity))
            .sum()
    }

    #[test]
    fn test_add_merges_quantities() {
        let mut cart = CartStore::new();
        let a = item("A", 1000);

        assert_eq!(cart.add_item(&a, qty(2)), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_amount(), Price::from(20));

        assert_eq!(cart.add_item(&a, qty(3)), 5);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&a.id).unwrap().item_quantity, 5);
        assert_eq!(cart.total_amount(), Price::from(50));
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut cart = CartStore::new();
        cart.add_item(&item("B", 100), qty(1));
        cart.add_item(&item("A", 100), qty(1));
        cart.add_item(&item("B", 100), qty(1));

        let ids: Vec<&str> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_one_line_per_id_with_summed_quantity() {
        let mut cart = CartStore::new();
        let adds = [("A", 1), ("B", 4), ("A", 2), ("C", 1), ("B", 1), ("A", 7)];
        for (id, n) in adds {
            cart.add_item(&item(id, 250), qty(n));
            assert_eq!(cart.total_amount(), expected_total(&cart));
        }

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.get(&ItemId::from("A")).unwrap().item_quantity, 10);
        assert_eq!(cart.get(&ItemId::from("B")).unwrap().item_quantity, 5);
        assert_eq!(cart.get(&ItemId::from("C")).unwrap().item_quantity, 1);
    }

    #[test]
    fn test_dec_clamps_at_one() {
        let mut cart = CartStore::new();
        let a = item("A", 1000);
        cart.add_item(&a, qty(1));

        for _ in 0..10 {
            cart.quantity(&a.id, QuantityAction::Dec);
            assert_eq!(cart.get(&a.id).unwrap().item_quantity, 1);
        }
        assert_eq!(cart.total_amount(), Price::from(10));
    }

    #[test]
    fn test_inc_and_dec_update_total() {
        let mut cart = CartStore::new();
        let a = item("A", 1999);
        cart.add_item(&a, qty(2));

        cart.quantity(&a.id, QuantityAction::Inc);
        assert_eq!(cart.total_amount(), Price::from_cents(5997));

        cart.quantity(&a.id, QuantityAction::Dec);
        cart.quantity(&a.id, QuantityAction::Dec);
        assert_eq!(cart.get(&a.id).unwrap().item_quantity, 1);
        assert_eq!(cart.total_amount(), Price::from_cents(1999));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut cart = CartStore::new();
        cart.add_item(&item("A", 500), qty(2));
        let before = cart.state().clone();

        cart.remove_item(&ItemId::from("missing"));
        cart.quantity(&ItemId::from("missing"), QuantityAction::Inc);
        assert_eq!(cart.state(), &before);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = CartStore::new();
        let a = item("A", 500);
        let b = item("B", 700);
        cart.add_item(&a, qty(2));
        cart.add_item(&b, qty(1));

        cart.remove_item(&a.id);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_amount(), Price::from(7));

        cart.clear_cart();
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), Price::ZERO);
    }

    #[test]
    fn test_watchers_see_every_commit() {
        let mut cart = CartStore::new();
        let mut rx = cart.subscribe();
        assert!(rx.borrow().items.is_empty());

        cart.add_item(&item("A", 300), qty(2));
        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.total_amount, Price::from(6));

        cart.clear_cart();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().total_amount, Price::ZERO);
    }

    #[test]
    fn test_state_serializes_with_wire_names() {
        let mut cart = CartStore::new();
        cart.add_item(&item("A", 1000), qty(2));

        let value = serde_json::to_value(cart.state()).unwrap();
        assert_eq!(value["totalAmount"], serde_json::json!(20.0));
        assert_eq!(value["items"][0]["_id"], "A");
        assert_eq!(value["items"][0]["itemQuantity"], 2);
    }
}
