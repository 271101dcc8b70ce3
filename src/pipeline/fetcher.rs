//! Message fetcher — lists a page of ids and resolves each to metadata.
//!
//! Resolution runs through a bounded concurrent stream purely as a latency
//! optimization; `buffered` yields in input order, so the returned records
//! stay aligned with the listing. Any failure aborts the whole fetch — a
//! partial corpus is useless to the clustering stages downstream.

use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::provider::{EmailRecord, MailProvider};

pub struct MessageFetcher {
    provider: Arc<dyn MailProvider>,
    page_size: u32,
    concurrency: usize,
}

impl MessageFetcher {
    pub fn new(provider: Arc<dyn MailProvider>, page_size: u32, concurrency: usize) -> Self {
        Self {
            provider,
            page_size,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch one page of inbox messages with full metadata, in listing order.
    pub async fn fetch_inbox(&self) -> Result<Vec<EmailRecord>, PipelineError> {
        let ids = self
            .provider
            .list_messages(self.page_size)
            .await
            .map_err(PipelineError::Fetch)?;
        debug!(count = ids.len(), "Listed message ids");

        let records: Vec<EmailRecord> = stream::iter(ids)
            .map(|id| {
                let provider = Arc::clone(&self.provider);
                async move { provider.get_message(&id).await }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await
            .map_err(PipelineError::Fetch)?;

        info!(count = records.len(), "Fetched inbox page");
        Ok(records)
    }
}
