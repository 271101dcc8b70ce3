//! Triage pipeline orchestration.
//!
//! One run flows through:
//! 1. `MessageFetcher::fetch_inbox()` — provider I/O, order-preserving
//! 2. `vectorize()` + `assign_clusters()` — the clustering core
//! 3. `ClusterIndex::build()` — records bucketed by label
//! 4. `Archiver::archive_cluster()` — user-triggered batch mutation

pub mod archiver;
pub mod fetcher;
pub mod triage;

pub use archiver::Archiver;
pub use fetcher::MessageFetcher;
pub use triage::{ClusterSummary, ClusteredInbox, TriagePipeline};
