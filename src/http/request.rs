//! HTTP request builder and transport
//!
//! `RequestBuilder` is the single path every SDK call goes through: it carries
//! the resolved URL, auth and default headers, the per-attempt timeout, and
//! the retry policy. Retryable failures (connection errors, timeouts, 429,
//! 5xx) are retried with exponential backoff; fatal failures surface
//! immediately. When the retry budget runs out the last underlying error is
//! wrapped in [`Error::RetryExhausted`](crate::Error::RetryExhausted).

use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::retry::{calculate_retry_delay, RetryConfig};
use super::Response;
use crate::error::{Error, Result};

/// Builder for HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    timeout: Duration,
    retry_config: RetryConfig,
    http_client: Option<reqwest::Client>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
            http_client: None,
        }
    }

    /// Set the HTTP client to use.
    pub(crate) fn with_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set a header. Invalid names or values are dropped with a warning.
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(key), Ok(value)) = (
            key.as_ref().parse::<HeaderName>(),
            value.as_ref().parse::<HeaderValue>(),
        ) {
            self.headers.insert(key, value);
        } else {
            warn!(header = key.as_ref(), "dropping invalid header");
        }
        self
    }

    /// Append a query parameter to the request URL.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.url
            .query_pairs_mut()
            .append_pair(key, &value.to_string());
        self
    }

    /// Set a JSON request body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Set the per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy for this request.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Get the resolved URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send the request and get a response.
    ///
    /// Fatal HTTP error statuses are returned as a `Response` so callers can
    /// decide how to interpret the body; use
    /// [`Response::parse_result`] to convert them into typed errors.
    pub async fn send(self) -> Result<Response> {
        let client = self
            .http_client
            .ok_or_else(|| Error::Configuration("no HTTP client configured".to_string()))?;

        debug!(method = %self.method, url = %self.url, "sending request");

        let mut attempt: u32 = 0;
        loop {
            let error = match Self::attempt(
                &client,
                &self.method,
                &self.url,
                &self.headers,
                self.body.as_deref(),
                self.timeout,
                attempt,
            )
            .await
            {
                Ok(response) => {
                    if !response.is_error() {
                        return Ok(response);
                    }
                    let error = Error::from_response(
                        response.status().as_u16(),
                        &String::from_utf8_lossy(response.body()),
                        response.headers(),
                    );
                    if !error.is_retryable() {
                        // Fatal status: hand the response back so callers can
                        // interpret the body via parse_result.
                        return Ok(response);
                    }
                    error
                }
                Err(error) => error,
            };

            if let Some(delay) = calculate_retry_delay(&error, attempt, &self.retry_config) {
                warn!(attempt, delay_ms = delay.as_millis() as u64, %error, "retrying request");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if error.is_retryable() {
                return Err(Error::RetryExhausted {
                    attempts: attempt + 1,
                    source: Box::new(error),
                });
            }
            return Err(error);
        }
    }

    /// Issue a single attempt, classifying transport failures.
    async fn attempt(
        client: &reqwest::Client,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        timeout: Duration,
        retries_taken: u32,
    ) -> Result<Response> {
        let mut req = client
            .request(method.clone(), url.as_str())
            .timeout(timeout);

        for (key, value) in headers {
            req = req.header(key, value);
        }
        if let Some(body) = body {
            req = req.body(body.to_vec());
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(timeout)
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?
            .to_vec();

        Ok(Response::new(status, headers, body, retries_taken))
    }
}
