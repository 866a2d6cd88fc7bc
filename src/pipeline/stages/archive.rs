use std::fs;
use std::io;

use tracing::info;

use crate::archive::create_archive;
use crate::error::{LogshipError, LogshipResult};
use crate::pipeline::{PipelineContext, PipelineStage};
use crate::state::Stage;

/// Stage that packages the filtered data into a tar archive
///
/// The archive holds exactly one entry, named by the filtered artifact's base
/// filename. It is the durable deliverable of the run; the intermediate
/// artifacts stay on disk next to it.
///
/// # Context Requirements
/// - Input: `filtered_path` (PathBuf) - The filtered artifact
/// - Input: `archive_path` (PathBuf) - Destination for the archive;
///   overwritten if present
pub struct ArchiveStage;

impl ArchiveStage {
    /// Create a new archive stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArchiveStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for ArchiveStage {
    fn kind(&self) -> Stage {
        Stage::Archiving
    }

    fn name(&self) -> &str {
        "Archive Result"
    }

    fn pre_execute(&self, context: &PipelineContext) -> LogshipResult<()> {
        let filtered_path = context.get_path("filtered_path")?;
        if !filtered_path.is_file() {
            return Err(LogshipError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("filtered artifact missing: {}", filtered_path.display()),
            )));
        }
        Ok(())
    }

    fn execute(&self, context: &mut PipelineContext) -> LogshipResult<()> {
        let filtered_path = context.get_path("filtered_path")?;
        let archive_path = context.get_path("archive_path")?;

        info!(
            source = %filtered_path.display(),
            archive = %archive_path.display(),
            session = %context.session_id(),
            "Creating tar archive"
        );

        create_archive(&filtered_path, &archive_path)?;

        info!(archive = %archive_path.display(), "Archive created");
        Ok(())
    }

    fn post_execute(&self, context: &PipelineContext) -> LogshipResult<()> {
        let archive_path = context.get_path("archive_path")?;
        let metadata = fs::metadata(&archive_path).map_err(|e| {
            LogshipError::PipelineError(format!(
                "Failed to read archive metadata: {}",
                e
            ))
        })?;

        if metadata.len() == 0 {
            return Err(LogshipError::PipelineError(format!(
                "Archive is empty: {}",
                archive_path.display()
            )));
        }
        Ok(())
    }
}
