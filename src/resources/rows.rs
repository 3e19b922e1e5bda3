//! Row fetch pagination and batched push
//!
//! Fetch traverses cursor-based pages lazily: one GET per page, following the
//! `next_page_token` the backend returns until it is absent. Push partitions
//! the outgoing records into bounded batches, submits each independently, and
//! aggregates per-batch outcomes so a single bad batch never sinks the rest.

use chrono::{DateTime, Utc};
use futures::stream::{self, Stream, TryStreamExt};
use http::Method;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    client::Client,
    error::{Error, Result},
    types::{ChannelPayload, PushFailure, PushOptions, PushResult, Record},
};

/// Builder for a paginated row fetch.
#[derive(Clone)]
pub struct RowsQuery {
    client: Client,
    channel_id: Uuid,
    page_size: Option<usize>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
}

impl RowsQuery {
    pub(crate) fn new(client: Client, channel_id: Uuid) -> Self {
        Self {
            client,
            channel_id,
            page_size: None,
            since: None,
            until: None,
        }
    }

    /// Ask the backend for at most `n` rows per page.
    pub fn page_size(mut self, n: usize) -> Self {
        self.page_size = Some(n);
        self
    }

    /// Only fetch rows at or after this timestamp.
    pub fn since(mut self, ts: DateTime<Utc>) -> Self {
        self.since = Some(ts);
        self
    }

    /// Only fetch rows before this timestamp.
    pub fn until(mut self, ts: DateTime<Utc>) -> Self {
        self.until = Some(ts);
        self
    }

    /// Turn the query into a page-by-page cursor.
    pub fn pages(self) -> RowPages {
        RowPages { query: self, next_token: None, done: false }
    }

    /// Fetch every page and collect all rows.
    pub async fn all(self) -> Result<Vec<Record>> {
        let mut pages = self.pages();
        let mut rows = Vec::new();
        while let Some(page) = pages.next_page().await? {
            rows.extend(page);
        }
        Ok(rows)
    }
}

/// Lazy, finite, non-restartable traversal of a channel's row pages.
///
/// Each [`next_page`](RowPages::next_page) call issues exactly one fetch
/// request. Once the backend omits the next-page token the traversal is over
/// for good; an empty first page with no token is an empty sequence, not an
/// error. A page failure (after retries) ends the traversal at that point —
/// rows from earlier pages remain valid.
pub struct RowPages {
    query: RowsQuery,
    next_token: Option<String>,
    done: bool,
}

impl RowPages {
    /// Fetch the next page of rows, or `None` when the sequence is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Record>>> {
        if self.done {
            return Ok(None);
        }

        let q = &self.query;
        let mut request = q.client.request(
            Method::GET,
            &format!("data/v1/channels/{}/rows", q.channel_id),
        )?;

        if let Some(page_size) = q.page_size {
            request = request.query("page_size", page_size);
        }
        if let Some(since) = q.since {
            request = request.query("since", since.to_rfc3339());
        }
        if let Some(until) = q.until {
            request = request.query("until", until.to_rfc3339());
        }
        if let Some(token) = &self.next_token {
            request = request.query("page_token", token);
        }

        let payload: ChannelPayload = match request.send().await.and_then(|r| r.parse_result()) {
            Ok(payload) => payload,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        self.next_token = payload.next_page_token.clone();
        if self.next_token.is_none() {
            self.done = true;
        }

        let rows = payload.rows.unwrap_or_default();
        debug!(
            channel = %q.channel_id,
            rows = rows.len(),
            more = !self.done,
            "fetched row page"
        );
        Ok(Some(rows))
    }

    /// Flatten the pages into a lazy stream of records.
    pub fn into_stream(self) -> impl Stream<Item = Result<Record>> {
        stream::try_unfold(self, |mut pages| async move {
            match pages.next_page().await? {
                Some(page) => Ok::<_, Error>(Some((
                    stream::iter(page.into_iter().map(Ok::<Record, Error>)),
                    pages,
                ))),
                None => Ok(None),
            }
        })
        .try_flatten()
    }
}

/// Partition `records` into batches and push each one independently.
///
/// Order is preserved within and across batches. A retryable failure is
/// retried batch-wise by the transport; a fatal failure marks only that
/// batch's records as failed. Fails outright only when every batch failed
/// ([`Error::AllBatchesFailed`]) or the call is misconfigured before any
/// batch goes out.
pub(crate) async fn push_batches(
    client: &Client,
    channel_id: Uuid,
    records: Vec<Record>,
    options: PushOptions,
) -> Result<PushResult> {
    let batch_size = options.batch_size.unwrap_or_else(|| client.batch_size());
    if batch_size == 0 {
        return Err(Error::Configuration("batch size must be non-zero".to_string()));
    }
    if records.is_empty() {
        return Ok(PushResult::default());
    }

    let mut result = PushResult::default();
    let mut batches = 0usize;
    let mut pending = records.into_iter();

    loop {
        let batch: Vec<Record> = pending.by_ref().take(batch_size).collect();
        if batch.is_empty() {
            break;
        }
        let index = batches;
        batches += 1;

        match push_one_batch(client, channel_id, &batch, &options, index).await {
            Ok(acked) => {
                debug!(channel = %channel_id, batch = index, rows = batch.len(), "batch pushed");
                // Prefer rows echoed by the backend, but only when the echo
                // matches the batch one-to-one; otherwise the submitted
                // records keep the success count equal to the input count.
                if acked.len() == batch.len() {
                    result.successes.extend(acked);
                } else {
                    result.successes.extend(batch);
                }
            }
            Err(error) => {
                warn!(channel = %channel_id, batch = index, %error, "batch failed");
                result.failures.push(PushFailure { records: batch, error });
            }
        }
    }

    if result.failures.len() == batches {
        let first = result
            .failures
            .into_iter()
            .next()
            .map(|f| f.error)
            .unwrap_or_else(|| Error::Operation {
                message: "push produced no outcome".to_string(),
                payload: None,
            });
        return Err(Error::AllBatchesFailed { batches, source: Box::new(first) });
    }

    Ok(result)
}

async fn push_one_batch(
    client: &Client,
    channel_id: Uuid,
    batch: &[Record],
    options: &PushOptions,
    index: usize,
) -> Result<Vec<Record>> {
    let payload = ChannelPayload::with_rows(channel_id, batch.to_vec());
    let mut request = client
        .request(Method::POST, &format!("data/v1/channels/{channel_id}/rows"))?
        .json(&payload)?;

    if let Some(key) = &options.idempotency_key {
        request = request.header("idempotency-key", format!("{key}-{index}"));
    }

    let mut ack: ChannelPayload = request.send().await?.parse_result()?;
    if !ack.op_succeeded() {
        return Err(Error::Operation {
            message: ack
                .op_status
                .clone()
                .unwrap_or_else(|| "backend rejected batch".to_string()),
            payload: Some(Box::new(ack)),
        });
    }
    Ok(ack.rows.take().unwrap_or_default())
}
