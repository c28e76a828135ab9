//! Per-session shopping cart.
//!
//! A [`CartStore`] keeps one entry per product in insertion order. Every
//! mutation returns the [`CartEvent`] it caused (if any) so the caller can
//! surface a notice without the store knowing anything about presentation.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// A product in the cart with its quantity (always at least 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.unit_price.times(self.quantity)
    }
}

/// Something observable that happened to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A product was added; `quantity` is the entry's new quantity.
    Added { name: String, quantity: u32 },
    /// An entry's quantity changed but stayed above zero.
    QuantityChanged { name: String, quantity: u32 },
    /// An entry left the cart.
    Removed { name: String },
    /// The whole cart was emptied.
    Cleared,
}

/// Ordered cart entries, unique by product ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartStore {
    entries: Vec<CartEntry>,
}

impl CartStore {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Entries in the order they were first added.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Whether the cart holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Quantity of a product, or 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.entries
            .iter()
            .find(|e| e.product.id == id)
            .map_or(0, |e| e.quantity)
    }

    /// Total number of units (the cart badge).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Add one unit of `product`, merging with an existing entry.
    pub fn add_to_cart(&mut self, product: &Product) -> Option<CartEvent> {
        let quantity = match self.entries.iter_mut().find(|e| e.product.id == product.id) {
            Some(entry) => {
                entry.quantity = entry.quantity.saturating_add(1);
                entry.quantity
            }
            None => {
                self.entries.push(CartEntry {
                    product: product.clone(),
                    quantity: 1,
                });
                1
            }
        };
        Some(CartEvent::Added {
            name: product.name.clone(),
            quantity,
        })
    }

    /// Change a product's quantity by `delta`, removing it at zero.
    ///
    /// Unknown products are ignored.
    pub fn update_quantity(&mut self, id: ProductId, delta: i64) -> Option<CartEvent> {
        let pos = self.entries.iter().position(|e| e.product.id == id)?;
        let entry = self.entries.get_mut(pos)?;
        let next = i64::from(entry.quantity).saturating_add(delta).max(0);

        if next == 0 {
            let removed = self.entries.remove(pos);
            return Some(CartEvent::Removed {
                name: removed.product.name,
            });
        }

        entry.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        Some(CartEvent::QuantityChanged {
            name: entry.product.name.clone(),
            quantity: entry.quantity,
        })
    }

    /// Remove a product entirely. No-op if absent.
    pub fn remove_from_cart(&mut self, id: ProductId) -> Option<CartEvent> {
        let pos = self.entries.iter().position(|e| e.product.id == id)?;
        let removed = self.entries.remove(pos);
        Some(CartEvent::Removed {
            name: removed.product.name,
        })
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) -> Option<CartEvent> {
        if self.entries.is_empty() {
            return None;
        }
        self.entries.clear();
        Some(CartEvent::Cleared)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: u32, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            description: String::new(),
            unit_price: Price::new(price),
            image_ref: String::new(),
            category: "Misc".to_string(),
            rating: None,
            featured: None,
        }
    }

    #[test]
    fn test_add_merges_by_id() {
        let mut cart = CartStore::new();
        let shirt = product(1, 599);

        cart.add_to_cart(&shirt);
        let event = cart.add_to_cart(&shirt);

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.quantity_of(shirt.id), 2);
        assert_eq!(
            event,
            Some(CartEvent::Added {
                name: "Item 1".to_string(),
                quantity: 2
            })
        );
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product(3, 10));
        cart.add_to_cart(&product(1, 10));
        cart.add_to_cart(&product(3, 10));

        let ids: Vec<u32> = cart.entries().iter().map(|e| e.product.id.as_u32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_decrement_to_zero_removes() {
        let mut cart = CartStore::new();
        let mug = product(2, 349);
        cart.add_to_cart(&mug);

        let event = cart.update_quantity(mug.id, -1);

        assert!(cart.is_empty());
        assert!(matches!(event, Some(CartEvent::Removed { .. })));
    }

    #[test]
    fn test_large_negative_delta_clamps_to_removal() {
        let mut cart = CartStore::new();
        let mug = product(2, 349);
        cart.add_to_cart(&mug);
        cart.add_to_cart(&mug);

        cart.update_quantity(mug.id, -10);
        assert_eq!(cart.quantity_of(mug.id), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_increment_reports_quantity() {
        let mut cart = CartStore::new();
        let cap = product(3, 399);
        cart.add_to_cart(&cap);

        let event = cart.update_quantity(cap.id, 2);
        assert_eq!(
            event,
            Some(CartEvent::QuantityChanged {
                name: "Item 3".to_string(),
                quantity: 3
            })
        );
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product(1, 10));
        let before = cart.clone();

        assert_eq!(cart.update_quantity(ProductId::new(99), 1), None);
        assert_eq!(cart.remove_from_cart(ProductId::new(99)), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_cart() {
        let mut cart = CartStore::new();
        assert_eq!(cart.clear_cart(), None);

        cart.add_to_cart(&product(1, 10));
        assert_eq!(cart.clear_cart(), Some(CartEvent::Cleared));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_item_count_and_line_total() {
        let mut cart = CartStore::new();
        let shirt = product(1, 599);
        cart.add_to_cart(&shirt);
        cart.add_to_cart(&shirt);
        cart.add_to_cart(&product(2, 299));

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.entries().first().unwrap().line_total(), Price::new(1198));
    }

    #[test]
    fn test_serde_roundtrip_for_session_storage() {
        let mut cart = CartStore::new();
        cart.add_to_cart(&product(1, 599));
        let json = serde_json::to_string(&cart).unwrap();
        let back: CartStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
