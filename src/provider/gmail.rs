//! Gmail REST adapter for `MailProvider`.
//!
//! Talks to the Gmail v1 API with a caller-supplied OAuth access token.
//! Token acquisition/refresh is an external concern; this client only
//! attaches the bearer header. One attempt per call, no retries.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

use crate::error::{ConfigError, ProviderError};
use crate::provider::{EmailRecord, MailProvider};

const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// How much of an error body to keep in the error value.
const ERROR_BODY_LIMIT: usize = 200;

// ── Client ──────────────────────────────────────────────────────────

/// Gmail API client scoped to the authenticated user (`users/me`).
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    access_token: SecretString,
}

impl GmailClient {
    pub fn new(access_token: SecretString) -> Self {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    /// Client against a non-default endpoint (tests, proxies).
    pub fn with_base_url(access_token: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            access_token,
        }
    }

    /// Build a client from `GMAIL_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var("GMAIL_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingEnvVar("GMAIL_ACCESS_TOKEN".into()))?;
        Ok(Self::new(SecretString::from(token)))
    }

    async fn expect_success(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let mut body = response.text().await.unwrap_or_default();
        body.truncate(ERROR_BODY_LIMIT);
        Err(ProviderError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait::async_trait]
impl MailProvider for GmailClient {
    async fn list_messages(&self, page_size: u32) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/users/me/messages", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token.expose_secret())
            .query(&[("maxResults", page_size.to_string())])
            .send()
            .await?;
        let response = Self::expect_success("messages.list", response).await?;
        let listing: ListResponse = response.json().await?;

        debug!(count = listing.messages.len(), "Listed inbox messages");
        Ok(listing.messages.into_iter().map(|m| m.id).collect())
    }

    async fn get_message(&self, id: &str) -> Result<EmailRecord, ProviderError> {
        let url = format!("{}/users/me/messages/{}", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_token.expose_secret())
            .query(&[("format", "full")])
            .send()
            .await?;
        let response = Self::expect_success("messages.get", response).await?;
        let message: MessageResponse = response.json().await?;
        parse_record(message)
    }

    async fn batch_remove_label(
        &self,
        ids: &[String],
        label: &str,
    ) -> Result<usize, ProviderError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let url = format!("{}/users/me/messages/batchModify", self.base_url);
        let body = serde_json::json!({
            "ids": ids,
            "removeLabelIds": [label],
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&body)
            .send()
            .await?;
        Self::expect_success("messages.batchModify", response).await?;

        // batchModify returns an empty body on success; all ids were modified.
        Ok(ids.len())
    }
}

// ── Wire format ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    id: String,
    #[serde(default)]
    snippet: String,
    payload: Option<MessagePayload>,
    internal_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

/// Convert a Gmail message into an `EmailRecord`, failing fast on
/// structurally broken payloads.
fn parse_record(message: MessageResponse) -> Result<EmailRecord, ProviderError> {
    let payload = message
        .payload
        .ok_or_else(|| ProviderError::MalformedMessage {
            id: message.id.clone(),
            reason: "missing payload".into(),
        })?;

    let mut raw_headers = HashMap::with_capacity(payload.headers.len());
    let mut subject = String::new();
    for header in payload.headers {
        if header.name.eq_ignore_ascii_case("Subject") && subject.is_empty() {
            subject = header.value.clone();
        }
        raw_headers.entry(header.name).or_insert(header.value);
    }

    // internalDate is epoch milliseconds as a decimal string.
    let received_at = match message.internal_date {
        Some(raw) => {
            let millis: i64 = raw.parse().map_err(|_| ProviderError::MalformedMessage {
                id: message.id.clone(),
                reason: format!("unparseable internalDate {raw:?}"),
            })?;
            Some(chrono::DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                ProviderError::MalformedMessage {
                    id: message.id.clone(),
                    reason: format!("internalDate {millis} out of range"),
                }
            })?)
        }
        None => None,
    };

    Ok(EmailRecord {
        id: message.id,
        subject,
        snippet: message.snippet,
        raw_headers,
        received_at,
    })
}
