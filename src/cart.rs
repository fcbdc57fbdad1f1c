//! Cart

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::products::ProductId;

/// Smallest quantity a line item can hold.
pub const MIN_QUANTITY: u32 = 1;

/// Largest quantity a line item can hold.
pub const MAX_QUANTITY: u32 = 10;

/// Clamp a requested quantity into the allowed range.
#[must_use]
pub fn clamp_quantity(quantity: u32) -> u32 {
    quantity.clamp(MIN_QUANTITY, MAX_QUANTITY)
}

/// One product/quantity pair within a cart.
///
/// `name`, `unit_price_minor` and `image` are a display snapshot cached when
/// the line is first added. They are never authoritative for pricing, which
/// always re-reads the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog id of the product.
    pub product_id: ProductId,

    /// Quantity ordered, always within `MIN_QUANTITY..=MAX_QUANTITY`.
    pub quantity: u32,

    /// Product name at insertion time (display only).
    pub name: String,

    /// Unit price in minor units at insertion time (display only).
    pub unit_price_minor: i64,

    /// Image reference at insertion time (display only).
    pub image: Option<String>,
}

/// Ordered collection of line items, unique by product id.
///
/// Insertion order is preserved so callers can render the cart stably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: SmallVec<[LineItem; 8]>,
}

impl Cart {
    /// Create a new empty cart.
    #[must_use]
    pub fn new() -> Self {
        Cart::default()
    }

    /// Get the line item for a product id.
    pub fn line(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// Get the line item for a product id, mutably.
    pub fn line_mut(&mut self, product_id: ProductId) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    /// Append a new line item at the end of the cart.
    ///
    /// Callers must ensure the product id is not already present; the cart
    /// holds at most one line per product.
    pub fn push(&mut self, item: LineItem) {
        debug_assert!(
            self.line(item.product_id).is_none(),
            "duplicate line for product {}",
            item.product_id
        );

        self.items.push(item);
    }

    /// Remove the line item for a product id.
    ///
    /// Returns `true` if a line was removed. Removing an absent id is a no-op.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();

        self.items.retain(|item| item.product_id != product_id);

        self.items.len() != before
    }

    /// Iterate over the line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem> {
        self.items.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: u32, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId(id),
            quantity,
            name: format!("Product {id}"),
            unit_price_minor: 1000,
            image: None,
        }
    }

    #[test]
    fn push_preserves_insertion_order() {
        let mut cart = Cart::new();

        cart.push(line(3, 1));
        cart.push(line(1, 2));
        cart.push(line(2, 1));

        let ids: Vec<u32> = cart.iter().map(|item| item.product_id.0).collect();

        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn remove_deletes_matching_line() {
        let mut cart = Cart::new();

        cart.push(line(1, 2));
        cart.push(line(2, 1));

        assert!(cart.remove(ProductId(1)));
        assert_eq!(cart.len(), 1);
        assert!(cart.line(ProductId(1)).is_none());
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::new();

        cart.push(line(1, 2));

        assert!(cart.remove(ProductId(1)));
        assert!(!cart.remove(ProductId(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn item_count_sums_quantities() {
        let mut cart = Cart::new();

        cart.push(line(1, 2));
        cart.push(line(2, 3));

        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn clamp_quantity_bounds() {
        assert_eq!(clamp_quantity(0), MIN_QUANTITY);
        assert_eq!(clamp_quantity(5), 5);
        assert_eq!(clamp_quantity(25), MAX_QUANTITY);
    }

    #[test]
    fn cart_round_trips_through_yaml() -> testresult::TestResult {
        let mut cart = Cart::new();

        cart.push(line(1, 2));
        cart.push(line(4, 1));

        let yaml = serde_norway::to_string(&cart)?;
        let restored: Cart = serde_norway::from_str(&yaml)?;

        assert_eq!(restored, cart);

        Ok(())
    }
}
