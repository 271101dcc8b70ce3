//! Triage pipeline — fetch, vectorize, cluster, index.
//!
//! Single-pass batch: every run recomputes the whole chain from a fresh
//! fetch; nothing is persisted between invocations.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cluster::{ClusterIndex, assign_clusters, vectorize};
use crate::config::TriageConfig;
use crate::error::PipelineError;
use crate::pipeline::fetcher::MessageFetcher;
use crate::provider::{EmailRecord, MailProvider};

/// How many subjects to show per cluster in summaries.
const SUMMARY_SUBJECTS: usize = 5;

// ── Output ──────────────────────────────────────────────────────────

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ClusteredInbox {
    /// Records bucketed by cluster label.
    pub index: ClusterIndex,
    /// The K this run was configured with.
    pub cluster_count: usize,
}

/// Display digest for one cluster.
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    pub cluster_id: usize,
    pub count: usize,
    /// Up to the first few subjects, in inbox order.
    pub subjects: Vec<String>,
}

impl ClusteredInbox {
    /// Per-cluster digests, ascending by cluster id.
    pub fn summaries(&self) -> Vec<ClusterSummary> {
        self.index
            .cluster_ids()
            .map(|cluster_id| {
                let records = self.index.records(cluster_id).unwrap_or_default();
                ClusterSummary {
                    cluster_id,
                    count: records.len(),
                    subjects: records
                        .iter()
                        .take(SUMMARY_SUBJECTS)
                        .map(|r| r.subject.clone())
                        .collect(),
                }
            })
            .collect()
    }
}

// ── Pipeline ────────────────────────────────────────────────────────

/// The fetch → vectorize → cluster → index pipeline.
pub struct TriagePipeline {
    fetcher: MessageFetcher,
    config: TriageConfig,
}

impl TriagePipeline {
    pub fn new(provider: Arc<dyn MailProvider>, config: TriageConfig) -> Self {
        let fetcher = MessageFetcher::new(provider, config.max_results, config.fetch_concurrency);
        Self { fetcher, config }
    }

    /// Run the full pipeline once.
    ///
    /// Messages without a usable subject are dropped before vectorization so
    /// records and vectors stay order-aligned. A fetch failure aborts the run
    /// before any clustering happens.
    pub async fn run(&self) -> Result<ClusteredInbox, PipelineError> {
        let fetched = self.fetcher.fetch_inbox().await?;
        let total = fetched.len();

        let records: Vec<EmailRecord> = fetched
            .into_iter()
            .filter(|r| !r.subject.trim().is_empty())
            .collect();
        if records.len() < total {
            debug!(
                dropped = total - records.len(),
                "Dropped messages without subjects"
            );
        }

        let subjects: Vec<&str> = records.iter().map(|r| r.subject.as_str()).collect();
        let matrix = vectorize(&subjects)?;
        let labels = assign_clusters(&matrix, self.config.cluster_count, self.config.random_seed)?;
        let index = ClusterIndex::build(records, &labels)?;

        info!(
            messages = index.total_records(),
            clusters = index.len(),
            "Clustered inbox"
        );
        Ok(ClusteredInbox {
            index,
            cluster_count: self.config.cluster_count,
        })
    }
}
