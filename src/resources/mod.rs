//! API resource endpoints
//!
//! Operations are grouped by resource the way the backend groups its routes:
//! channels (listing, admin, row fetch and push) and health probes.

pub mod channels;
pub mod health;
pub mod rows;

pub use channels::Channels;
pub use health::Health;
pub use rows::{RowPages, RowsQuery};
