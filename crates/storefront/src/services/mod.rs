//! Services behind the route handlers.
//!
//! - `downloads` - Temporary download references for generated documents
//! - `processing` - Simulated latency for contact, donation and checkout submits

pub mod downloads;
pub mod processing;

pub use downloads::DownloadStore;
pub use processing::simulate_processing;
