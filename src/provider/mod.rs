//! Mail provider abstraction — pure I/O, no clustering logic.

pub mod gmail;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use gmail::GmailClient;

/// Label whose removal archives a message.
pub const INBOX_LABEL: &str = "INBOX";

// ── Email record ────────────────────────────────────────────────────

/// A fetched email. Immutable once built.
///
/// Provider adapters parse their native wire format into this struct at the
/// fetch boundary; malformed payloads fail there instead of leaking untyped
/// maps into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Provider-native message id.
    pub id: String,
    /// Subject line; empty when the message carries no Subject header.
    pub subject: String,
    /// Short body preview as supplied by the provider.
    pub snippet: String,
    /// All message headers, first value wins on duplicates.
    pub raw_headers: HashMap<String, String>,
    /// When the provider received the message.
    pub received_at: Option<DateTime<Utc>>,
}

impl EmailRecord {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw_headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ── Provider trait ──────────────────────────────────────────────────

/// The three mail-provider operations this crate depends on.
///
/// Handles are passed explicitly (`Arc<dyn MailProvider>`) and owned by the
/// caller; there is no ambient client singleton.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// List up to `page_size` message ids from the inbox, newest first.
    async fn list_messages(&self, page_size: u32) -> Result<Vec<String>, ProviderError>;

    /// Resolve a message id to its full metadata.
    async fn get_message(&self, id: &str) -> Result<EmailRecord, ProviderError>;

    /// Remove `label` from every message in `ids` in a single batch call.
    /// Returns the number of affected messages.
    async fn batch_remove_label(
        &self,
        ids: &[String],
        label: &str,
    ) -> Result<usize, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Subject".to_string(), "Quarterly report".to_string());
        headers.insert("From".to_string(), "alice@example.com".to_string());
        let record = EmailRecord {
            id: "m1".into(),
            subject: "Quarterly report".into(),
            snippet: String::new(),
            raw_headers: headers,
            received_at: None,
        };
        assert_eq!(record.header("subject"), Some("Quarterly report"));
        assert_eq!(record.header("FROM"), Some("alice@example.com"));
        assert_eq!(record.header("Date"), None);
    }
}
