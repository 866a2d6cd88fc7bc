use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::error::{LogshipError, LogshipResult};
use crate::notify::{send_notification, CompletionNotice};
use crate::pipeline::{PipelineContext, PipelineStage};
use crate::state::Stage;

/// Stage that reports pipeline completion to the configured endpoint
///
/// Builds a success message with the current UTC timestamp and POSTs it once,
/// with a bounded timeout. A failed delivery is surfaced as an error; it does
/// not roll back the archive the earlier stages already produced.
///
/// # Context Requirements
/// - Input: `webhook_url` (String) - Endpoint URL; must be non-empty
/// - Input: `timeout_secs` (number) - Upper bound for the round trip
pub struct NotifyStage;

impl NotifyStage {
    /// Create a new notify stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for NotifyStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for NotifyStage {
    fn kind(&self) -> Stage {
        Stage::Notifying
    }

    fn name(&self) -> &str {
        "Send Notification"
    }

    fn pre_execute(&self, context: &PipelineContext) -> LogshipResult<()> {
        let webhook_url = context.get_string("webhook_url")?;
        if webhook_url.trim().is_empty() {
            return Err(LogshipError::PipelineError(
                "webhook_url must be configured for the notify stage".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, context: &mut PipelineContext) -> LogshipResult<()> {
        let webhook_url = context.get_string("webhook_url")?;
        let timeout = Duration::from_secs_f64(context.get_number("timeout_secs")?);

        let pipeline_name = context
            .get_metadata("pipeline_name")
            .unwrap_or("pipeline")
            .to_string();
        let notice = CompletionNotice::success(&pipeline_name, Utc::now());

        info!(
            endpoint = %webhook_url,
            session = %context.session_id(),
            "Sending completion notification"
        );

        let status = send_notification(&webhook_url, timeout, &notice)?;

        info!(status, "Completion notification acknowledged");
        Ok(())
    }
}
