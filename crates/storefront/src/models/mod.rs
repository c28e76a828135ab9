//! Session-backed models for storefront.

pub mod notice;
pub mod session;

pub use notice::{Notice, NoticeLevel, push_notice, take_notices};
pub use session::{DonationReceipt, ShopSession, keys as session_keys};
