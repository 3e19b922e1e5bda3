//! Main client implementation for the Kronicle API

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{Error, Result},
    http::{RequestBuilder, RetryConfig},
    resources::{Channels, Health},
};

/// Main client for interacting with the Kronicle backend.
///
/// The client holds the session: base address, bearer token, default timeout,
/// retry budget, and push batch size. It is immutable after construction and
/// cheap to clone; clones share the same session and connection pool, so
/// concurrently running operations never contend on client state.
///
/// # Example
///
/// ```rust,no_run
/// use kronicle::Client;
///
/// # fn example() -> kronicle::Result<()> {
/// let client = Client::new("http://127.0.0.1:8000", "secret-token")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

struct ClientInner {
    /// HTTP client for making requests
    http_client: reqwest::Client,
    /// Parsed base URL, guaranteed well-formed with a trailing slash
    base_url: Url,
    /// Bearer token applied to every request
    token: SecretString,
    /// Per-attempt timeout
    timeout: Duration,
    /// Retry policy shared by all requests
    retry: RetryConfig,
    /// Default number of records per push batch
    batch_size: usize,
    /// Custom headers to include with every request
    default_headers: http::HeaderMap,

    // Lazy-initialized resources
    channels: OnceLock<Channels>,
    health: OnceLock<Health>,
}

impl Client {
    /// Create a new client with a base URL and bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url, token))
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> KronicleClientBuilder {
        KronicleClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// All session validation happens here: a missing or malformed base URL
    /// and a missing token are [`Error::Configuration`], raised before any
    /// request is issued.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let base_url_string = config
            .base_url
            .ok_or_else(|| Error::Configuration("base URL is required".to_string()))?;

        if base_url_string.trim().is_empty() {
            return Err(Error::Configuration("base URL cannot be empty".to_string()));
        }

        // A trailing slash makes Url::join treat the last path segment as a
        // directory instead of replacing it.
        let normalized = if base_url_string.ends_with('/') {
            base_url_string
        } else {
            format!("{base_url_string}/")
        };

        let base_url: Url = normalized
            .parse()
            .map_err(|e| Error::Configuration(format!("invalid base URL: {e}")))?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::Configuration(format!(
                    "unsupported URL scheme '{scheme}', expected http or https"
                )))
            }
        }

        let token = config
            .token
            .ok_or_else(|| Error::Configuration("token is required".to_string()))?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("kronicle-rs/{}", crate::VERSION))
            .build()
            .map_err(|e| Error::Configuration(e.to_string()))?;

        let retry = RetryConfig {
            max_retries: config.max_retries,
            ..RetryConfig::default()
        };

        let inner = Arc::new(ClientInner {
            http_client,
            base_url,
            token,
            timeout: config.timeout,
            retry,
            batch_size: config.batch_size,
            default_headers: config.default_headers,
            channels: OnceLock::new(),
            health: OnceLock::new(),
        });

        Ok(Self { inner })
    }

    /// Access channel operations: listing, admin, row fetch and push.
    pub fn channels(&self) -> &Channels {
        self.inner
            .channels
            .get_or_init(|| Channels::new(self.clone()))
    }

    /// Access backend health probes.
    pub fn health(&self) -> &Health {
        self.inner.health.get_or_init(|| Health::new(self.clone()))
    }

    /// Create a request builder for a path relative to the base URL.
    ///
    /// Applies the session token as a bearer `authorization` header plus the
    /// configured timeout, retry policy, and default headers.
    pub(crate) fn request(&self, method: http::Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| Error::Configuration(format!("cannot resolve path '{path}': {e}")))?;

        let mut builder = RequestBuilder::new(method, url)
            .with_client(self.inner.http_client.clone())
            .timeout(self.inner.timeout)
            .retry_config(self.inner.retry.clone())
            .header("content-type", "application/json")
            .header(
                "authorization",
                format!("Bearer {}", self.inner.token.expose_secret()),
            );

        for (key, value) in &self.inner.default_headers {
            builder = builder.header(key.as_str(), value.to_str().unwrap_or(""));
        }

        Ok(builder)
    }

    /// Default number of records per push batch.
    pub(crate) fn batch_size(&self) -> usize {
        self.inner.batch_size
    }

    /// Get the base URL for the backend.
    pub fn base_url(&self) -> &str {
        self.inner.base_url.as_str()
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct KronicleClientBuilder {
    config: ClientConfig,
}

impl KronicleClientBuilder {
    /// Set the backend base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(SecretString::new(token.into().into_boxed_str()));
        self
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the maximum number of retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    /// Set the default push batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Add a custom default header.
    pub fn default_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(key), Ok(value)) = (
            key.as_ref().parse::<http::HeaderName>(),
            value.as_ref().parse::<http::HeaderValue>(),
        ) {
            self.config.default_headers.insert(key, value);
        }
        self
    }

    /// Build the client with the configured options.
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
