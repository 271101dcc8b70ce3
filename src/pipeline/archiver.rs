//! Archiver — removes the inbox label from every message in a cluster.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cluster::ClusterIndex;
use crate::error::PipelineError;
use crate::provider::{INBOX_LABEL, MailProvider};

pub struct Archiver {
    provider: Arc<dyn MailProvider>,
}

impl Archiver {
    pub fn new(provider: Arc<dyn MailProvider>) -> Self {
        Self { provider }
    }

    /// Archive every message in `cluster_id` with one batch mutation.
    ///
    /// An absent or empty cluster is a no-op: returns 0 without touching the
    /// provider. The mutation is not reversible through this crate.
    pub async fn archive_cluster(
        &self,
        index: &ClusterIndex,
        cluster_id: usize,
    ) -> Result<usize, PipelineError> {
        let ids = index.message_ids(cluster_id);
        if ids.is_empty() {
            debug!(cluster_id, "Archive requested for empty cluster");
            return Ok(0);
        }

        let affected = self
            .provider
            .batch_remove_label(&ids, INBOX_LABEL)
            .await
            .map_err(PipelineError::Archive)?;

        info!(cluster_id, affected, "Archived cluster");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::ProviderError;
    use crate::provider::EmailRecord;

    #[derive(Default)]
    struct RecordingProvider {
        batch_calls: Mutex<Vec<(Vec<String>, String)>>,
    }

    #[async_trait]
    impl MailProvider for RecordingProvider {
        async fn list_messages(&self, _page_size: u32) -> Result<Vec<String>, ProviderError> {
            unimplemented!("not used in archiver tests")
        }

        async fn get_message(&self, _id: &str) -> Result<EmailRecord, ProviderError> {
            unimplemented!("not used in archiver tests")
        }

        async fn batch_remove_label(
            &self,
            ids: &[String],
            label: &str,
        ) -> Result<usize, ProviderError> {
            self.batch_calls
                .lock()
                .unwrap()
                .push((ids.to_vec(), label.to_string()));
            Ok(ids.len())
        }
    }

    fn record(id: &str) -> EmailRecord {
        EmailRecord {
            id: id.into(),
            subject: "subject".into(),
            snippet: String::new(),
            raw_headers: HashMap::new(),
            received_at: None,
        }
    }

    #[tokio::test]
    async fn archives_exactly_the_cluster_members() {
        let records = vec![record("a"), record("b"), record("c"), record("d")];
        let index = ClusterIndex::build(records, &[0, 1, 0, 1]).unwrap();

        let provider = Arc::new(RecordingProvider::default());
        let archiver = Archiver::new(Arc::clone(&provider) as Arc<dyn MailProvider>);

        let affected = archiver.archive_cluster(&index, 1).await.unwrap();
        assert_eq!(affected, 2);

        let calls = provider.batch_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, vec!["b", "d"]);
        assert_eq!(calls[0].1, INBOX_LABEL);
    }

    #[tokio::test]
    async fn empty_cluster_is_a_noop() {
        let index = ClusterIndex::build(vec![record("a")], &[0]).unwrap();

        let provider = Arc::new(RecordingProvider::default());
        let archiver = Archiver::new(Arc::clone(&provider) as Arc<dyn MailProvider>);

        let affected = archiver.archive_cluster(&index, 5).await.unwrap();
        assert_eq!(affected, 0);
        assert!(provider.batch_calls.lock().unwrap().is_empty());
    }
}
