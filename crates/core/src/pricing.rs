//! Cart totals.
//!
//! Shipping is a flat fee that is waived once the subtotal strictly exceeds
//! the free-shipping threshold.

use serde::{Deserialize, Serialize};

use crate::cart::{CartEntry, CartStore};
use crate::types::Price;

/// Default subtotal above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Price = Price::new(999);

/// Default shipping fee charged at or below the threshold.
pub const FLAT_SHIPPING_FEE: Price = Price::new(50);

/// Shipping rules applied to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub free_shipping_threshold: Price,
    pub flat_shipping_fee: Price,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: FLAT_SHIPPING_FEE,
        }
    }
}

/// Everything the cart panel shows below the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    pub item_count: u64,
}

impl PricingPolicy {
    /// Sum of `unit_price × quantity` over all entries.
    #[must_use]
    pub fn subtotal(&self, cart: &CartStore) -> Price {
        cart.entries().iter().map(CartEntry::line_total).sum()
    }

    /// Shipping owed on `subtotal`.
    #[must_use]
    pub fn shipping_fee(&self, subtotal: Price) -> Price {
        if subtotal > self.free_shipping_threshold {
            Price::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Subtotal plus shipping.
    #[must_use]
    pub fn grand_total(&self, cart: &CartStore) -> Price {
        let subtotal = self.subtotal(cart);
        subtotal + self.shipping_fee(subtotal)
    }

    #[must_use]
    pub fn totals(&self, cart: &CartStore) -> CartTotals {
        let subtotal = self.subtotal(cart);
        let shipping = self.shipping_fee(subtotal);
        CartTotals {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count: cart.item_count(),
        }
    }
}
