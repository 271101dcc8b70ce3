//! Error types for Inbox Triage.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures from the external mail provider.
///
/// Wraps the underlying transport or API failure. No retry/backoff happens
/// at this level — one attempt per call, the caller decides what to do.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Malformed message payload for {id}: {reason}")]
    MalformedMessage { id: String, reason: String },
}

/// Errors from the clustering core (vectorizer, assigner, index).
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("Corpus is empty: no clusterable terms in any subject")]
    EmptyCorpus,

    #[error("Not enough documents to cluster: have {have}, requested {requested} clusters")]
    InsufficientData { have: usize, requested: usize },

    #[error("Records/assignments length mismatch: {records} records vs {assignments} assignments")]
    LengthMismatch { records: usize, assignments: usize },
}

/// Pipeline stage failures.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Message fetch failed: {0}")]
    Fetch(#[source] ProviderError),

    #[error("Clustering failed: {0}")]
    Cluster(#[from] ClusterError),

    #[error("Archive failed: {0}")]
    Archive(#[source] ProviderError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
