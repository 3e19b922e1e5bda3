//! HTTP transport layer
//!
//! This module provides the request/response plumbing for the SDK: request
//! building with auth headers and query params, timeout enforcement, and
//! bounded retry with exponential backoff.

pub use request::RequestBuilder;
pub use response::Response;
pub use retry::RetryConfig;

mod request;
mod response;
pub mod retry;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
