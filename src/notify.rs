//! Completion notification delivery
//!
//! One run sends at most one notification: a JSON body with a single text
//! field, POSTed to the configured endpoint. Delivery is a single attempt
//! with a bounded timeout; retries belong to the external invoker.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::{LogshipError, LogshipResult};

/// Notification payload: one human-readable text field
#[derive(Debug, Clone, Serialize)]
pub struct CompletionNotice {
    pub content: String,
}

impl CompletionNotice {
    /// Build the success message for a run completed at `timestamp`
    pub fn success(pipeline_name: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: format!(
                "✅ Pipeline '{}' completed successfully for run at {} (UTC).",
                pipeline_name,
                timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        }
    }
}

/// POST `notice` to `url`, waiting at most `timeout` for the round trip
///
/// Any 2xx answer counts as delivered and its status code is returned. A
/// non-2xx answer is a rejection; transport errors and timeouts are delivery
/// failures.
pub fn send_notification(
    url: &str,
    timeout: Duration,
    notice: &CompletionNotice,
) -> LogshipResult<u16> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()?;

    let response = client.post(url).json(notice).send()?;
    let status = response.status();

    if status.is_success() {
        info!(status = status.as_u16(), "Notification delivered");
        Ok(status.as_u16())
    } else {
        Err(LogshipError::NotificationRejected(status.as_u16()))
    }
}
