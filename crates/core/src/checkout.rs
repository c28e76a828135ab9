//! Checkout state machine.
//!
//! ```text
//! Idle --open_cart--> CartOpen --proceed_to_checkout--> CheckoutOpen
//!  ^                     |                                  |
//!  +----close_cart-------+                                  | submit
//!  +----cancel_checkout-------------------------------------+
//!  |                                                        v
//!  +----dismiss / tick(reset deadline)------------- OrderComplete
//! ```
//!
//! Leaving `OrderComplete` always clears the cart. The reset is driven by the
//! caller passing the current time to [`CheckoutState::tick`]; the machine
//! never schedules anything itself.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{CartEvent, CartStore};
use crate::pricing::{CartTotals, PricingPolicy};
use crate::types::Email;

/// Rejected checkout actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

/// Shipping and payment details collected by the checkout form.
///
/// Only the last four card digits are kept; the full number and CVV never
/// leave the form handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub pin_code: String,
    pub card_last4: String,
}

impl CheckoutDetails {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// What the order-complete screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub customer_name: String,
    pub email: Email,
    pub city: String,
    pub card_last4: String,
    pub totals: CartTotals,
}

/// Where a shopper is in the cart/checkout flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    CartOpen,
    CheckoutOpen,
    OrderComplete {
        summary: OrderSummary,
        completed_at: DateTime<Utc>,
    },
}

impl CheckoutState {
    /// Short name used in error messages and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "browsing",
            Self::CartOpen => "the cart is open",
            Self::CheckoutOpen => "checking out",
            Self::OrderComplete { .. } => "an order is complete",
        }
    }

    #[must_use]
    pub const fn is_cart_open(&self) -> bool {
        matches!(self, Self::CartOpen)
    }

    #[must_use]
    pub const fn is_checkout_open(&self) -> bool {
        matches!(self, Self::CheckoutOpen)
    }

    /// The completed order, if any.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderSummary> {
        match self {
            Self::OrderComplete { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// When a completed order will reset on its own. `None` if the delay
    /// is too large to represent, in which case it never resets.
    #[must_use]
    pub fn reset_deadline(&self, reset_after: Duration) -> Option<DateTime<Utc>> {
        match self {
            Self::OrderComplete { completed_at, .. } => completed_at.checked_add_signed(reset_after),
            _ => None,
        }
    }

    const fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            from: self.name(),
            action,
        }
    }

    /// Show the cart panel. Also reachable from the checkout form.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` while an order is complete.
    pub fn open_cart(&mut self) -> Result<(), CheckoutError> {
        if matches!(self, Self::OrderComplete { .. }) {
            return Err(self.invalid("open the cart"));
        }
        *self = Self::CartOpen;
        Ok(())
    }

    /// Hide the cart panel.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the cart is open.
    pub fn close_cart(&mut self) -> Result<(), CheckoutError> {
        if !self.is_cart_open() {
            return Err(self.invalid("close the cart"));
        }
        *self = Self::Idle;
        Ok(())
    }

    /// Move from the cart panel to the checkout form.
    ///
    /// # Errors
    ///
    /// `EmptyCart` if there is nothing to buy, `InvalidTransition` unless the
    /// cart is open.
    pub fn proceed_to_checkout(&mut self, cart: &CartStore) -> Result<(), CheckoutError> {
        if !self.is_cart_open() {
            return Err(self.invalid("proceed to checkout"));
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        *self = Self::CheckoutOpen;
        Ok(())
    }

    /// Abandon the checkout form.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the checkout form is open.
    pub fn cancel_checkout(&mut self) -> Result<(), CheckoutError> {
        if !self.is_checkout_open() {
            return Err(self.invalid("cancel checkout"));
        }
        *self = Self::Idle;
        Ok(())
    }

    /// Place the order. There is no payment gateway, so a submission with
    /// complete details always succeeds.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the checkout form is open, `EmptyCart` if
    /// the cart was emptied in the meantime.
    pub fn submit(
        &mut self,
        cart: &CartStore,
        details: CheckoutDetails,
        policy: &PricingPolicy,
        now: DateTime<Utc>,
    ) -> Result<OrderSummary, CheckoutError> {
        if !self.is_checkout_open() {
            return Err(self.invalid("place an order"));
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = OrderSummary {
            customer_name: details.full_name(),
            email: details.email,
            city: details.city,
            card_last4: details.card_last4,
            totals: policy.totals(cart),
        };
        *self = Self::OrderComplete {
            summary: summary.clone(),
            completed_at: now,
        };
        Ok(summary)
    }

    /// Leave the order-complete screen, emptying the cart.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless an order is complete.
    pub fn dismiss(&mut self, cart: &mut CartStore) -> Result<Option<CartEvent>, CheckoutError> {
        if !matches!(self, Self::OrderComplete { .. }) {
            return Err(self.invalid("dismiss the order"));
        }
        *self = Self::Idle;
        Ok(cart.clear_cart())
    }

    /// Reset a completed order once `reset_after` has passed since it was
    /// placed. Returns `true` if the state changed.
    pub fn tick(&mut self, cart: &mut CartStore, now: DateTime<Utc>, reset_after: Duration) -> bool {
        match self.reset_deadline(reset_after) {
            Some(deadline) if now >= deadline => {
                *self = Self::Idle;
                cart.clear_cart();
                true
            }
            _ => false,
        }
    }

    /// Called before any cart mutation: a completed order is dismissed first
    /// so the new item lands in a fresh cart.
    pub fn settle_for_cart_change(&mut self, cart: &mut CartStore) -> bool {
        self.dismiss(cart).is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::tests::product;
    use crate::types::Price;

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: Email::parse("asha@example.org").unwrap(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            pin_code: "411001".to_string(),
            card_last4: "4242".to_string(),
        }
    }

    fn cart_with_shirts() -> CartStore {
        let mut cart = CartStore::new();
        let shirt = product(1, 599);
        cart.add_to_cart(&shirt);
        cart.add_to_cart(&shirt);
        cart
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-15T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_happy_path() {
        let mut cart = cart_with_shirts();
        let mut state = CheckoutState::default();

        state.open_cart().unwrap();
        state.proceed_to_checkout(&cart).unwrap();
        let summary = state
            .submit(&cart, details(), &PricingPolicy::default(), now())
            .unwrap();
        assert_eq!(summary.customer_name, "Asha Rao");
        assert_eq!(summary.totals.total, Price::new(1198));

        // Not yet due.
        assert!(!state.tick(&mut cart, now() + Duration::milliseconds(4999), Duration::seconds(5)));
        assert!(state.order().is_some());

        assert!(state.tick(&mut cart, now() + Duration::seconds(5), Duration::seconds(5)));
        assert_eq!(state, CheckoutState::Idle);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let cart = CartStore::new();
        let mut state = CheckoutState::CartOpen;
        assert_eq!(
            state.proceed_to_checkout(&cart),
            Err(CheckoutError::EmptyCart)
        );
        assert!(state.is_cart_open());
    }

    #[test]
    fn test_submit_requires_checkout_open() {
        let cart = cart_with_shirts();
        let mut state = CheckoutState::CartOpen;
        let err = state
            .submit(&cart, details(), &PricingPolicy::default(), now())
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidTransition { .. }));
    }

    #[test]
    fn test_submit_rejects_cart_emptied_during_checkout() {
        let cart = CartStore::new();
        let mut state = CheckoutState::CheckoutOpen;
        let err = state
            .submit(&cart, details(), &PricingPolicy::default(), now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_close_and_cancel() {
        let mut state = CheckoutState::CartOpen;
        state.close_cart().unwrap();
        assert_eq!(state, CheckoutState::Idle);
        assert!(state.close_cart().is_err());

        let mut state = CheckoutState::CheckoutOpen;
        state.cancel_checkout().unwrap();
        assert_eq!(state, CheckoutState::Idle);
        assert!(state.cancel_checkout().is_err());
    }

    #[test]
    fn test_open_cart_from_checkout_goes_back() {
        let mut state = CheckoutState::CheckoutOpen;
        state.open_cart().unwrap();
        assert!(state.is_cart_open());
    }

    #[test]
    fn test_dismiss_clears_cart() {
        let mut cart = cart_with_shirts();
        let mut state = CheckoutState::CheckoutOpen;
        state
            .submit(&cart, details(), &PricingPolicy::default(), now())
            .unwrap();

        assert!(state.open_cart().is_err());
        let event = state.dismiss(&mut cart).unwrap();
        assert_eq!(event, Some(CartEvent::Cleared));
        assert!(cart.is_empty());
        assert!(state.dismiss(&mut cart).is_err());
    }

    #[test]
    fn test_cart_change_after_order_starts_fresh() {
        let mut cart = cart_with_shirts();
        let mut state = CheckoutState::CheckoutOpen;
        state
            .submit(&cart, details(), &PricingPolicy::default(), now())
            .unwrap();

        assert!(state.settle_for_cart_change(&mut cart));
        cart.add_to_cart(&product(2, 299));
        assert_eq!(cart.item_count(), 1);

        // Nothing to settle outside OrderComplete.
        assert!(!state.settle_for_cart_change(&mut cart));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_tick_outside_order_complete_is_noop() {
        let mut cart = cart_with_shirts();
        let mut state = CheckoutState::CartOpen;
        assert!(!state.tick(&mut cart, now(), Duration::zero()));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_serde_roundtrip() {
        let cart = cart_with_shirts();
        let mut state = CheckoutState::CheckoutOpen;
        state
            .submit(&cart, details(), &PricingPolicy::default(), now())
            .unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let back: CheckoutState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
