//! Cluster index — records bucketed by their assigned label.

use std::collections::BTreeMap;

use crate::error::ClusterError;
use crate::provider::EmailRecord;

/// Mapping from cluster id to the records assigned to it, in input order.
///
/// Only non-empty clusters get a bucket; together the buckets are an exact
/// partition of the input.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndex {
    buckets: BTreeMap<usize, Vec<EmailRecord>>,
}

impl ClusterIndex {
    /// Pair each record with its label.
    ///
    /// The two sequences must be order-aligned and equally long; a mismatch
    /// is a programming-contract violation surfaced as `LengthMismatch`.
    pub fn build(records: Vec<EmailRecord>, assignments: &[usize]) -> Result<Self, ClusterError> {
        if records.len() != assignments.len() {
            return Err(ClusterError::LengthMismatch {
                records: records.len(),
                assignments: assignments.len(),
            });
        }

        let mut buckets: BTreeMap<usize, Vec<EmailRecord>> = BTreeMap::new();
        for (record, &cluster) in records.into_iter().zip(assignments) {
            buckets.entry(cluster).or_default().push(record);
        }
        Ok(Self { buckets })
    }

    /// Records in a cluster, in input order. `None` for absent clusters.
    pub fn records(&self, cluster_id: usize) -> Option<&[EmailRecord]> {
        self.buckets.get(&cluster_id).map(Vec::as_slice)
    }

    /// Message ids in a cluster; empty for absent clusters.
    pub fn message_ids(&self, cluster_id: usize) -> Vec<String> {
        self.records(cluster_id)
            .map(|records| records.iter().map(|r| r.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Ids of non-empty clusters, ascending.
    pub fn cluster_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    /// Number of non-empty clusters.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total records across all buckets.
    pub fn total_records(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
