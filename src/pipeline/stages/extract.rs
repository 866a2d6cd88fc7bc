use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};

use tracing::info;

use crate::error::{LogshipError, LogshipResult};
use crate::pipeline::{PipelineContext, PipelineStage};
use crate::state::Stage;

/// Delimiter separating the client address from the rest of a
/// combined-format access log record
pub const RECORD_DELIMITER: &str = " - - ";

/// Stage that extracts one IP token per log line
///
/// Each line is split on [`RECORD_DELIMITER`]; the first segment, trimmed of
/// surrounding whitespace, becomes one output line. A line without the
/// delimiter emits the whole line trimmed. The mapping is 1:1 and order
/// preserving, so the artifact has exactly as many lines as the log.
///
/// # Context Requirements
/// - Input: `log_path` (PathBuf) - Source access log (existence guaranteed by
///   the scan stage)
/// - Input: `extracted_path` (PathBuf) - Destination for the extracted
///   artifact; overwritten if present
pub struct ExtractStage;

impl ExtractStage {
    /// Create a new extract stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtractStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for ExtractStage {
    fn kind(&self) -> Stage {
        Stage::Extracting
    }

    fn name(&self) -> &str {
        "Extract Addresses"
    }

    fn execute(&self, context: &mut PipelineContext) -> LogshipResult<()> {
        let log_path = context.get_path("log_path")?;
        let extracted_path = context.get_path("extracted_path")?;

        info!(
            source = %log_path.display(),
            session = %context.session_id(),
            "Extracting IP addresses"
        );

        if let Some(parent) = extracted_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let reader = BufReader::new(File::open(&log_path)?);
        let mut writer = BufWriter::new(File::create(&extracted_path)?);

        let mut line_count = 0usize;
        for line in reader.lines() {
            let line = line?;
            let token = match line.split_once(RECORD_DELIMITER) {
                Some((address, _)) => address.trim(),
                // No delimiter: emit the whole line trimmed
                None => line.trim(),
            };
            writeln!(writer, "{}", token)?;
            line_count += 1;
        }
        writer.flush()?;

        info!(
            lines = line_count,
            artifact = %extracted_path.display(),
            "IP addresses written"
        );
        Ok(())
    }

    fn post_execute(&self, context: &PipelineContext) -> LogshipResult<()> {
        let extracted_path = context.get_path("extracted_path")?;
        if !extracted_path.is_file() {
            return Err(LogshipError::PipelineError(format!(
                "Extracted artifact was not created: {}",
                extracted_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run_extract(log_content: &str) -> String {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("log.txt");
        let extracted_path = temp_dir.path().join("extracted_data.txt");
        fs::write(&log_path, log_content).unwrap();

        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", log_path);
        context.set_path("extracted_path", extracted_path.clone());

        let stage = ExtractStage::new();
        stage.execute(&mut context).unwrap();
        stage.post_execute(&context).unwrap();

        fs::read_to_string(&extracted_path).unwrap()
    }

    #[test]
    fn test_extract_takes_leading_address() {
        let output = run_extract(
            "10.0.0.1 - - [10/Nov/2025:00:00:01 +0000] \"GET / HTTP/1.1\" 200 512\n\
             198.46.149.143 - - [10/Nov/2025:00:00:02 +0000] \"GET /admin HTTP/1.1\" 403 128\n\
             10.0.0.2 - - [10/Nov/2025:00:00:03 +0000] \"GET /index.html HTTP/1.1\" 200 2048\n",
        );
        assert_eq!(output, "10.0.0.1\n198.46.149.143\n10.0.0.2\n");
    }

    #[test]
    fn test_extract_preserves_line_count() {
        let output = run_extract("1.1.1.1 - - a\n2.2.2.2 - - b\n3.3.3.3 - - c\n4.4.4.4 - - d\n");
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn test_extract_line_without_delimiter() {
        // The whole line, trimmed, becomes the token
        let output = run_extract("  not a log record  \n10.0.0.1 - - rest\n");
        assert_eq!(output, "not a log record\n10.0.0.1\n");
    }

    #[test]
    fn test_extract_trims_whitespace() {
        let output = run_extract("  10.0.0.1 - - rest\n");
        assert_eq!(output, "10.0.0.1\n");
    }

    #[test]
    fn test_extract_empty_log() {
        let output = run_extract("");
        assert_eq!(output, "");
    }

    #[test]
    fn test_extract_overwrites_previous_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("log.txt");
        let extracted_path = temp_dir.path().join("extracted_data.txt");
        fs::write(&log_path, "10.0.0.1 - - rest\n").unwrap();
        fs::write(&extracted_path, "stale content from an older run\n").unwrap();

        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", log_path);
        context.set_path("extracted_path", extracted_path.clone());

        let stage = ExtractStage::new();
        stage.execute(&mut context).unwrap();

        assert_eq!(fs::read_to_string(&extracted_path).unwrap(), "10.0.0.1\n");
    }

    #[test]
    fn test_extract_creates_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("log.txt");
        let extracted_path = temp_dir.path().join("artifacts").join("extracted_data.txt");
        fs::write(&log_path, "10.0.0.1 - - rest\n").unwrap();

        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", log_path);
        context.set_path("extracted_path", extracted_path.clone());

        let stage = ExtractStage::new();
        stage.execute(&mut context).unwrap();
        assert!(extracted_path.is_file());
    }

    #[test]
    fn test_extract_unreadable_source() {
        let temp_dir = TempDir::new().unwrap();
        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", temp_dir.path().join("missing.txt"));
        context.set_path("extracted_path", temp_dir.path().join("extracted_data.txt"));

        let stage = ExtractStage::new();
        let result = stage.execute(&mut context);
        assert!(matches!(result, Err(LogshipError::Io(_))));
    }
}
