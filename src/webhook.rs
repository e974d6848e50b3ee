//! Submission assembly and webhook delivery
//!
//! At-most-once, no-retry delivery: the user-visible confirmation never
//! waits on this result, and a failed POST keeps the full payload in the
//! log for manual recovery.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Fixed tag identifying the channel in submitted records.
pub const SOURCE_TAG: &str = "teams";

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// The finalized record handed to the delivery collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRecord {
    pub path: Vec<String>,
    pub description: String,
    pub source: String,
    /// Serialized as an ISO-8601 / RFC 3339 string.
    pub timestamp: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Stamp a completed navigation with the source tag and the current
    /// instant. Created once per submission, then discarded after dispatch.
    pub fn new(path: Vec<String>, description: String) -> Self {
        Self {
            path,
            description,
            source: SOURCE_TAG.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResult {
    Delivered,
    /// No endpoint configured; payload logged locally. Not an error.
    Skipped,
    /// POST failed or returned a non-success status; payload retained in
    /// the log.
    Failed,
}

/// Seam toward the delivery collaborator
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, record: &SubmissionRecord) -> DispatchResult;
}

/// Production sink: HTTP POST of the JSON record
pub struct WebhookClient {
    endpoint: Option<String>,
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(endpoint: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self { endpoint, http }
    }
}

#[async_trait]
impl SubmissionSink for WebhookClient {
    async fn submit(&self, record: &SubmissionRecord) -> DispatchResult {
        let payload = serde_json::to_value(record).unwrap_or_default();

        let Some(endpoint) = &self.endpoint else {
            tracing::info!(%payload, "no webhook configured, submission logged only");
            return DispatchResult::Skipped;
        };

        match self.http.post(endpoint).json(record).send().await {
            Ok(res) if res.status().is_success() => {
                tracing::info!(path = ?record.path, "submission delivered");
                DispatchResult::Delivered
            }
            Ok(res) => {
                tracing::error!(
                    status = %res.status(),
                    %payload,
                    "webhook rejected submission; payload retained in log"
                );
                DispatchResult::Failed
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    %payload,
                    "webhook delivery failed; payload retained in log"
                );
                DispatchResult::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_source_and_iso_timestamp() {
        let record = SubmissionRecord::new(
            vec!["Hardware".to_string(), "Printers".to_string()],
            "out of toner".to_string(),
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["source"].as_str(), Some("teams"));
        assert_eq!(json["description"].as_str(), Some("out of toner"));
        let path: Vec<&str> = json["path"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(path, ["Hardware", "Printers"]);

        let stamp = json["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[tokio::test]
    async fn missing_endpoint_degrades_to_log_only() {
        let sink = WebhookClient::new(None);
        let record = SubmissionRecord::new(vec![], "help".to_string());
        assert_eq!(sink.submit(&record).await, DispatchResult::Skipped);
    }
}
