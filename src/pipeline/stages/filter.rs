use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use tracing::info;

use crate::error::{LogshipError, LogshipResult};
use crate::pipeline::{PipelineContext, PipelineStage};
use crate::state::Stage;

/// Stage that drops the blocked address from the extracted data
///
/// Each line is compared, trimmed, for exact equality with the blocked value.
/// Non-matching lines pass through unchanged; matching lines are dropped
/// entirely. The output is an order-preserving subsequence of the input.
///
/// # Context Requirements
/// - Input: `extracted_path` (PathBuf) - The extracted artifact
/// - Input: `filtered_path` (PathBuf) - Destination for the filtered
///   artifact; overwritten if present
/// - Input: `blocked_ip` (String) - The address to drop; must be non-empty
///
/// # Context Outputs
/// - `dropped_count` (number) - How many lines the filter removed
pub struct FilterStage;

impl FilterStage {
    /// Create a new filter stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for FilterStage {
    fn kind(&self) -> Stage {
        Stage::Filtering
    }

    fn name(&self) -> &str {
        "Filter Blocked Address"
    }

    fn pre_execute(&self, context: &PipelineContext) -> LogshipResult<()> {
        let blocked_ip = context.get_string("blocked_ip")?;
        if blocked_ip.trim().is_empty() {
            return Err(LogshipError::PipelineError(
                "blocked_ip must be configured for the filter stage".to_string(),
            ));
        }
        Ok(())
    }

    fn execute(&self, context: &mut PipelineContext) -> LogshipResult<()> {
        let extracted_path = context.get_path("extracted_path")?;
        let filtered_path = context.get_path("filtered_path")?;
        let blocked_ip = context.get_string("blocked_ip")?;

        info!(
            blocked = %blocked_ip,
            session = %context.session_id(),
            "Filtering blocked address"
        );

        let reader = BufReader::new(File::open(&extracted_path)?);
        let mut writer = BufWriter::new(File::create(&filtered_path)?);

        let mut kept = 0usize;
        let mut dropped = 0usize;
        for line in reader.lines() {
            let line = line?;
            if line.trim() == blocked_ip {
                dropped += 1;
                continue;
            }
            writeln!(writer, "{}", line)?;
            kept += 1;
        }
        writer.flush()?;

        context.set_number("dropped_count", dropped as f64);

        info!(
            kept,
            dropped,
            artifact = %filtered_path.display(),
            "Filtered data written"
        );
        Ok(())
    }
}
