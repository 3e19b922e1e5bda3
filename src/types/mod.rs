//! Core data types shared across the SDK
//!
//! Records are schemaless ordered field maps; `ChannelPayload` is the wire
//! envelope every endpoint speaks; push types carry batched write outcomes.

mod payload;
mod push;
mod record;

pub use payload::{ChannelPayload, ColumnType};
pub use push::{PushFailure, PushOptions, PushResult};
pub use record::Record;
