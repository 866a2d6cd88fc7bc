use std::time::Duration;

use crate::error::LogshipResult;
use crate::state::Stage;

use super::context::PipelineContext;

/// A single stage in a pipeline
///
/// Each stage performs one step of the run. Stages are executed sequentially
/// by the pipeline executor; the first error stops the pipeline and the
/// remaining stages never run.
pub trait PipelineStage: Send + Sync {
    /// Which link of the chain this stage implements
    fn kind(&self) -> Stage;

    /// Stage name for logging and result reporting
    fn name(&self) -> &str;

    /// Execute this stage
    ///
    /// The stage can read from and write to the pipeline context.
    fn execute(&self, context: &mut PipelineContext) -> LogshipResult<()>;

    /// Called before execute() - useful for validation
    fn pre_execute(&self, _context: &PipelineContext) -> LogshipResult<()> {
        Ok(())
    }

    /// Called after execute() - useful for verifying the stage's output
    fn post_execute(&self, _context: &PipelineContext) -> LogshipResult<()> {
        Ok(())
    }
}

/// Result of a pipeline stage execution
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Which stage this result belongs to
    pub stage: Stage,

    /// Stage name
    pub stage_name: String,

    /// Whether the stage succeeded
    pub success: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Duration of execution
    pub duration: Duration,
}

impl StageResult {
    /// Create a successful stage result
    pub fn success(stage: Stage, stage_name: impl Into<String>, duration: Duration) -> Self {
        Self {
            stage,
            stage_name: stage_name.into(),
            success: true,
            error: None,
            duration,
        }
    }

    /// Create a failed stage result
    pub fn failure(
        stage: Stage,
        stage_name: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            stage,
            stage_name: stage_name.into(),
            success: false,
            error: Some(error.into()),
            duration,
        }
    }
}

/// Result of a complete pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Pipeline name
    pub pipeline_name: String,

    /// Whether the pipeline succeeded
    pub success: bool,

    /// Results from each stage that ran
    pub stage_results: Vec<StageResult>,

    /// Total duration
    pub total_duration: Duration,

    /// Error message if failed
    pub error: Option<String>,
}

impl PipelineResult {
    /// Create a successful pipeline result
    pub fn success(
        pipeline_name: impl Into<String>,
        stage_results: Vec<StageResult>,
        total_duration: Duration,
    ) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            success: true,
            stage_results,
            total_duration,
            error: None,
        }
    }

    /// Create a failed pipeline result
    pub fn failure(
        pipeline_name: impl Into<String>,
        stage_results: Vec<StageResult>,
        error: impl Into<String>,
        total_duration: Duration,
    ) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            success: false,
            stage_results,
            total_duration,
            error: Some(error.into()),
        }
    }

    /// Get the number of stages that were executed
    pub fn executed_stages(&self) -> usize {
        self.stage_results.len()
    }

    /// Get the stage that failed (if any)
    pub fn failed_stage(&self) -> Option<&StageResult> {
        self.stage_results.iter().find(|r| !r.success)
    }
}
