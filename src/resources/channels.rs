//! Channel operations: listing, lookup, admin, and row access
//!
//! Read and write routes live on the data plane (`data/v1`); channel
//! lifecycle routes live on the setup plane (`setup/v1`), mirroring the
//! backend's route prefixes.

use http::Method;
use tracing::debug;
use uuid::Uuid;

use crate::{
    client::Client,
    error::{Error, Result},
    resources::rows::{push_batches, RowsQuery},
    types::{ChannelPayload, PushOptions, PushResult, Record},
};

/// Channels resource.
#[derive(Clone)]
pub struct Channels {
    client: Client,
}

impl Channels {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List all channels.
    pub async fn list(&self) -> Result<Vec<ChannelPayload>> {
        self.client
            .request(Method::GET, "data/v1/channels")?
            .send()
            .await?
            .parse_result()
    }

    /// Get a channel by id, or `None` if the backend does not know it.
    pub async fn get(&self, id: Uuid) -> Result<Option<ChannelPayload>> {
        let result = self
            .client
            .request(Method::GET, &format!("data/v1/channels/{id}"))?
            .send()
            .await?
            .parse_result();

        match result {
            Ok(payload) => Ok(Some(payload)),
            Err(Error::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Find the first channel with the given name, scanning the channel list.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<ChannelPayload>> {
        let channels = self.list().await?;
        Ok(channels
            .into_iter()
            .find(|c| c.sensor_name.as_deref() == Some(name)))
    }

    /// Find the channel holding the most rows, if any channel has rows at all.
    pub async fn find_with_max_rows(&self) -> Result<Option<ChannelPayload>> {
        let channels = self.list().await?;
        Ok(channels
            .into_iter()
            .filter(|c| c.available_rows.unwrap_or(0) > 0)
            .max_by_key(|c| c.available_rows))
    }

    /// Column type labels the backend accepts in channel schemas.
    pub async fn column_types(&self) -> Result<serde_json::Value> {
        self.client
            .request(Method::GET, "data/v1/schemas/columns/types")?
            .send()
            .await?
            .parse_result()
    }

    /// Create a new channel. The payload must carry a `sensor_id`.
    pub async fn create(&self, payload: &ChannelPayload) -> Result<ChannelPayload> {
        payload.ensure_has_id()?;
        self.client
            .request(Method::POST, "setup/v1/channels")?
            .json(payload)?
            .send()
            .await?
            .parse_result()
    }

    /// Create the channel if missing, otherwise replace it.
    pub async fn upsert(&self, payload: &ChannelPayload) -> Result<ChannelPayload> {
        payload.ensure_has_id()?;
        self.client
            .request(Method::PUT, "setup/v1/channels")?
            .json(payload)?
            .send()
            .await?
            .parse_result()
    }

    /// Partially update an existing channel.
    pub async fn update(&self, payload: &ChannelPayload) -> Result<ChannelPayload> {
        let id = payload.ensure_has_id()?;
        self.client
            .request(Method::PATCH, &format!("setup/v1/channels/{id}"))?
            .json(payload)?
            .send()
            .await?
            .parse_result()
    }

    /// Delete a channel.
    ///
    /// Fails with [`Error::Operation`] when the channel does not exist, so a
    /// typo'd id is not silently a no-op.
    pub async fn delete(&self, id: Uuid) -> Result<ChannelPayload> {
        if self.get(id).await?.is_none() {
            return Err(Error::Operation {
                message: format!("no channel found with id {id}"),
                payload: None,
            });
        }
        debug!(%id, "deleting channel");
        self.client
            .request(Method::DELETE, &format!("setup/v1/channels/{id}"))?
            .send()
            .await?
            .parse_result()
    }

    /// Clone a channel, optionally overriding fields of the copy.
    pub async fn clone_channel(
        &self,
        id: Uuid,
        body: Option<&ChannelPayload>,
    ) -> Result<ChannelPayload> {
        let mut request = self
            .client
            .request(Method::POST, &format!("setup/v1/channels/{id}/clone"))?;
        if let Some(body) = body {
            request = request.json(body)?;
        }
        request.send().await?.parse_result()
    }

    /// Build a paginated row query for a channel.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use kronicle::Client;
    /// # use uuid::Uuid;
    /// # async fn example(client: Client, id: Uuid) -> kronicle::Result<()> {
    /// let rows = client.channels().rows(id).page_size(1000).all().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn rows(&self, id: Uuid) -> RowsQuery {
        RowsQuery::new(self.client.clone(), id)
    }

    /// Fetch a channel's data in column-oriented form.
    pub async fn columns(&self, id: Uuid) -> Result<ChannelPayload> {
        self.client
            .request(Method::GET, &format!("data/v1/channels/{id}/columns"))?
            .send()
            .await?
            .parse_result()
    }

    /// Push records into a channel using the session's default batch size.
    ///
    /// Never fails for partial outcomes: inspect
    /// [`PushResult::failures`](crate::PushResult::failures) to detect
    /// degraded pushes. Fails only when every batch failed or the session is
    /// misconfigured.
    pub async fn push(&self, id: Uuid, records: Vec<Record>) -> Result<PushResult> {
        push_batches(&self.client, id, records, PushOptions::default()).await
    }

    /// Push records with per-call batching and idempotency overrides.
    pub async fn push_with(
        &self,
        id: Uuid,
        records: Vec<Record>,
        options: PushOptions,
    ) -> Result<PushResult> {
        push_batches(&self.client, id, records, options).await
    }
}
