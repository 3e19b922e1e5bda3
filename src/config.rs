//! Configuration for the Kronicle client

use std::time::Duration;

use http::HeaderMap;
use secrecy::SecretString;

/// Configuration for the Kronicle client.
///
/// `base_url` and `token` are required; everything else has defaults. Missing
/// or malformed values fail at [`Client::from_config`](crate::Client::from_config),
/// never per call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Kronicle backend (required)
    pub base_url: Option<String>,

    /// Bearer token for authentication (required)
    pub token: Option<SecretString>,

    /// Per-attempt timeout for requests
    pub timeout: Duration,

    /// Maximum number of retries for retryable failures
    pub max_retries: u32,

    /// Maximum number of records per push batch
    pub batch_size: usize,

    /// Custom headers to include with every request
    pub default_headers: HeaderMap,
}

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default retry budget for retryable failures.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default push batch size, sized for the backend's payload limit.
pub const DEFAULT_BATCH_SIZE: usize = 500;

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            batch_size: DEFAULT_BATCH_SIZE,
            default_headers: HeaderMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the required fields set.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            token: Some(SecretString::new(token.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first, so local
    /// development setups work without exporting anything. Reads:
    /// - `KRONICLE_URL` for the backend base URL
    /// - `KRONICLE_TOKEN` for the bearer token
    /// - `KRONICLE_TIMEOUT` for the per-attempt timeout (seconds)
    /// - `KRONICLE_MAX_RETRIES` for the retry budget
    /// - `KRONICLE_BATCH_SIZE` for the push batch size
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if a
    /// numeric variable is set but does not parse.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self, crate::error::Error> {
        use crate::error::Error;
        use std::env;

        // Missing .env files are fine; exported variables still apply.
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(base_url) = env::var("KRONICLE_URL") {
            config.base_url = Some(base_url);
        }
        if let Ok(token) = env::var("KRONICLE_TOKEN") {
            config.token = Some(SecretString::new(token.into_boxed_str()));
        }

        if let Ok(timeout) = env::var("KRONICLE_TIMEOUT") {
            let secs = timeout.parse::<u64>().map_err(|_| {
                Error::Configuration(format!(
                    "KRONICLE_TIMEOUT must be a number of seconds, got '{timeout}'"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(retries) = env::var("KRONICLE_MAX_RETRIES") {
            config.max_retries = retries.parse::<u32>().map_err(|_| {
                Error::Configuration(format!(
                    "KRONICLE_MAX_RETRIES must be a number, got '{retries}'"
                ))
            })?;
        }

        if let Ok(batch) = env::var("KRONICLE_BATCH_SIZE") {
            config.batch_size = batch.parse::<usize>().map_err(|_| {
                Error::Configuration(format!(
                    "KRONICLE_BATCH_SIZE must be a number, got '{batch}'"
                ))
            })?;
        }

        Ok(config)
    }
}

/// Builder for creating a `ClientConfig` with a fluent API.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

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

    /// Add a default header sent with every request.
    pub fn default_header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(key), Ok(value)) = (
            key.as_ref().parse::<http::HeaderName>(),
            value.as_ref().parse::<http::HeaderValue>(),
        ) {
            self.config.default_headers.insert(key, value);
        }
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
