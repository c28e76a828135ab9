//! Takshashil Core - Domain types and logic for the foundation site.
//!
//! This crate holds everything the site needs to reason about its catalogs,
//! carts and checkout, with no I/O at all. The `takshashil-storefront`
//! crate depends on it and adds HTTP, sessions and templates.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP, no
//! sessions, no clocks of its own. Callers pass in the current time and the
//! pricing policy, so every operation is deterministic and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails and payment methods
//! - [`catalog`] - Products, books and library categories
//! - [`cart`] - Cart store and its mutations
//! - [`pricing`] - Subtotal, shipping and grand total
//! - [`filter`] - Category and free-text filtering
//! - [`checkout`] - Cart/checkout/order-complete state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod filter;
pub mod pricing;
pub mod types;

#[cfg(test)]
mod tests;

pub use cart::{CartEntry, CartEvent, CartStore};
pub use catalog::{Book, BookScope, Catalog, CatalogError, Library, LibraryCategory, Product};
pub use checkout::{CheckoutDetails, CheckoutError, CheckoutState, OrderSummary};
pub use filter::{FilterState, Searchable};
pub use pricing::{CartTotals, PricingPolicy};
pub use types::*;
