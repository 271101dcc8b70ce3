//! Configuration types.

use crate::error::ConfigError;

/// Gmail caps `maxResults` on the list endpoint at 500.
const MAX_PAGE_SIZE: u32 = 500;

/// Triage pipeline configuration.
///
/// `cluster_count` is the single source of truth for K — nothing else in the
/// crate assumes a particular number of clusters.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Number of clusters to partition the inbox into.
    pub cluster_count: usize,
    /// Seed for the clustering run; identical input + seed → identical labels.
    pub random_seed: u64,
    /// How many messages to list per run.
    pub max_results: u32,
    /// Bounded worker count for resolving message metadata.
    pub fetch_concurrency: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            cluster_count: 3,
            random_seed: 42,
            max_results: 200,
            fetch_concurrency: 8,
        }
    }
}

impl TriageConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Recognized variables: `INBOX_TRIAGE_CLUSTERS`, `INBOX_TRIAGE_SEED`,
    /// `INBOX_TRIAGE_MAX_RESULTS`, `INBOX_TRIAGE_FETCH_CONCURRENCY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("INBOX_TRIAGE_CLUSTERS") {
            config.cluster_count = parse_var("INBOX_TRIAGE_CLUSTERS", &v)?;
        }
        if let Ok(v) = std::env::var("INBOX_TRIAGE_SEED") {
            config.random_seed = parse_var("INBOX_TRIAGE_SEED", &v)?;
        }
        if let Ok(v) = std::env::var("INBOX_TRIAGE_MAX_RESULTS") {
            config.max_results = parse_var("INBOX_TRIAGE_MAX_RESULTS", &v)?;
        }
        if let Ok(v) = std::env::var("INBOX_TRIAGE_FETCH_CONCURRENCY") {
            config.fetch_concurrency = parse_var("INBOX_TRIAGE_FETCH_CONCURRENCY", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cluster_count".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.max_results == 0 || self.max_results > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                key: "max_results".into(),
                message: format!("must be in 1..={MAX_PAGE_SIZE}"),
            });
        }
        if self.fetch_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch_concurrency".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("expected an integer, got {raw:?}"),
    })
}
