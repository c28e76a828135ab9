//! Session-related types.
//!
//! Each shop keeps its own cart and checkout state under a per-shop key, so
//! the main shop and the merchandise page never share a cart.

use serde::{Deserialize, Serialize};
use takshashil_core::{CartStore, CheckoutState, PaymentMethod, Price};
use tower_sessions::Session;
use uuid::Uuid;

use crate::catalog::ShopKind;

/// Session keys.
pub mod keys {
    /// Key for pending one-shot notices.
    pub const NOTICES: &str = "notices";

    /// Key for the receipt of the last donation.
    pub const DONATION_RECEIPT: &str = "donation_receipt";

    /// Suffix of the per-shop cart and checkout key.
    pub const SHOP_SUFFIX: &str = "shop_state";
}

/// Cart and checkout progress of one shop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopSession {
    pub cart: CartStore,
    pub checkout: CheckoutState,
}

impl ShopSession {
    /// Session key for a shop, e.g. `merchandise_shop_state`.
    #[must_use]
    pub fn key(kind: ShopKind) -> String {
        format!("{}_{}", kind.session_prefix(), keys::SHOP_SUFFIX)
    }

    /// Load a shop's state, starting fresh if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn load(
        session: &Session,
        kind: ShopKind,
    ) -> Result<Self, tower_sessions::session::Error> {
        Ok(session.get(&Self::key(kind)).await?.unwrap_or_default())
    }

    /// Store a shop's state.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn save(
        &self,
        session: &Session,
        kind: ShopKind,
    ) -> Result<(), tower_sessions::session::Error> {
        session.insert(&Self::key(kind), self).await
    }
}

/// What the thank-you page shows after a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationReceipt {
    pub donor_name: String,
    pub email: String,
    pub amount: Price,
    pub payment_method: PaymentMethod,
    pub certificate_id: String,
    /// Token of the certificate parked in the download store.
    pub download_token: Uuid,
}

impl DonationReceipt {
    /// Link to the one-shot certificate download.
    #[must_use]
    pub fn download_url(&self) -> String {
        format!("/downloads/{}", self.download_token)
    }
}
