//! Backend health probes

use http::Method;

use crate::{client::Client, error::Result};

/// Health resource exposing the backend's liveness and readiness probes.
#[derive(Clone)]
pub struct Health {
    client: Client,
}

#[derive(serde::Deserialize)]
struct HealthStatus {
    status: String,
}

impl Health {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Whether the backend process is up.
    pub async fn alive(&self) -> Result<bool> {
        let status: HealthStatus = self
            .client
            .request(Method::GET, "health/live")?
            .send()
            .await?
            .parse_result()?;
        Ok(status.status == "alive")
    }

    /// Whether the backend is ready to serve requests.
    pub async fn ready(&self) -> Result<bool> {
        let status: HealthStatus = self
            .client
            .request(Method::GET, "health/ready")?
            .send()
            .await?
            .parse_result()?;
        Ok(status.status == "ready")
    }
}
