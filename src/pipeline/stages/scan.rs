use tracing::info;

use crate::error::{LogshipError, LogshipResult};
use crate::pipeline::{PipelineContext, PipelineStage};
use crate::state::Stage;

/// Stage that checks the source log exists before anything else runs
///
/// # Context Requirements
/// - Input: `log_path` (PathBuf) - Path to the source access log
///
/// # Context Outputs
/// - none. Downstream stages rely on this gate and do not re-check the
///   source log.
pub struct ScanStage;

impl ScanStage {
    /// Create a new scan stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScanStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for ScanStage {
    fn kind(&self) -> Stage {
        Stage::Checking
    }

    fn name(&self) -> &str {
        "Scan For Log"
    }

    fn execute(&self, context: &mut PipelineContext) -> LogshipResult<()> {
        let log_path = context.get_path("log_path")?;

        info!(
            path = %log_path.display(),
            session = %context.session_id(),
            "Scanning for log file"
        );

        if !log_path.is_file() {
            return Err(LogshipError::LogNotFound(log_path));
        }

        info!(path = %log_path.display(), "Log file found");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn test_scan_stage_success() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("log.txt");
        File::create(&log_path).unwrap();

        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", log_path);

        let stage = ScanStage::new();
        assert!(stage.execute(&mut context).is_ok());
    }

    #[test]
    fn test_scan_stage_missing_log() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("log.txt");

        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", log_path.clone());

        let stage = ScanStage::new();
        let result = stage.execute(&mut context);

        match result {
            Err(LogshipError::LogNotFound(path)) => assert_eq!(path, log_path),
            other => panic!("expected LogNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_stage_directory_is_not_a_log() {
        let temp_dir = TempDir::new().unwrap();
        let dir_path = temp_dir.path().join("log.txt");
        fs::create_dir(&dir_path).unwrap();

        let mut context = PipelineContext::new("run-123");
        context.set_path("log_path", dir_path);

        let stage = ScanStage::new();
        let result = stage.execute(&mut context);
        assert!(matches!(result, Err(LogshipError::LogNotFound(_))));
    }

    #[test]
    fn test_scan_stage_missing_context_key() {
        let mut context = PipelineContext::new("run-123");

        let stage = ScanStage::new();
        let result = stage.execute(&mut context);
        assert!(matches!(result, Err(LogshipError::PipelineError(_))));
    }

    #[test]
    fn test_scan_stage_name() {
        let stage = ScanStage::new();
        assert_eq!(stage.name(), "Scan For Log");
        assert_eq!(stage.kind(), Stage::Checking);
    }
}
