//! # Kronicle Rust SDK
//!
//! An idiomatic Rust client for the Kronicle channel-tracking API.
//!
//! The SDK covers the full request/response pipeline:
//! - Session setup with bearer-token authentication
//! - Bounded retry with exponential backoff for transient failures
//! - Cursor-based pagination for row fetches
//! - Batched pushes with per-batch partial-failure reporting
//! - Optional column-oriented [`Table`](tabular::Table) views (`tabular` feature)
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use kronicle::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .base_url("http://127.0.0.1:8000")
//!         .token("secret-token")
//!         .build()?;
//!
//!     for channel in client.channels().list().await? {
//!         println!(
//!             "{:?}: {} rows",
//!             channel.sensor_name,
//!             channel.available_rows.unwrap_or(0)
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::{ChannelPayload, ColumnType, PushFailure, PushOptions, PushResult, Record};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resources;
pub mod types;

// Column-oriented table views
#[cfg(feature = "tabular")]
pub mod tabular;

/// Prelude module for common imports
///
/// ```rust
/// use kronicle::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        resources::{RowPages, RowsQuery},
        ChannelPayload, Client, ClientConfig, Error, PushOptions, PushResult, Record, Result,
    };

    #[cfg(feature = "tabular")]
    pub use crate::tabular::Table;
}

/// SDK version, taken from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
