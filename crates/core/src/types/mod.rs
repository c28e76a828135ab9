//! Core types for the Takshashil site.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod payment;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{BookId, ProductId};
pub use payment::PaymentMethod;
pub use price::{CurrencyCode, Price};
