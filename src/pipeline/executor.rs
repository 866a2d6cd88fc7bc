use std::time::Instant;

use tracing::{error, info};

use crate::error::LogshipResult;

use super::context::PipelineContext;
use super::core::{PipelineResult, PipelineStage, StageResult};

/// Pipeline executor that runs stages sequentially
///
/// Stages are executed in the order they were added. If a stage fails, the
/// pipeline stops and the failure is recorded in the returned
/// [`PipelineResult`]; later stages never run. Artifacts written by earlier
/// stages stay on disk for diagnosis.
pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// Get the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Execute the pipeline
    pub fn execute(&self, context: &mut PipelineContext) -> LogshipResult<PipelineResult> {
        info!(
            pipeline = %self.name,
            stages = self.stages.len(),
            session = %context.session_id(),
            "Starting pipeline"
        );

        let pipeline_start = Instant::now();
        let mut stage_results = Vec::new();

        context.set_metadata("pipeline_name", &self.name);

        for (index, stage) in self.stages.iter().enumerate() {
            let stage_name = stage.name();

            info!(
                stage = %stage_name,
                position = index + 1,
                total = self.stages.len(),
                session = %context.session_id(),
                "Executing stage"
            );

            let stage_start = Instant::now();

            if let Err(e) = stage.pre_execute(context) {
                let error_msg = format!("Pre-execute failed: {}", e);
                error!(stage = %stage_name, error = %e, "Stage pre-execute failed");
                stage_results.push(StageResult::failure(
                    stage.kind(),
                    stage_name,
                    error_msg.clone(),
                    stage_start.elapsed(),
                ));
                return Ok(PipelineResult::failure(
                    &self.name,
                    stage_results,
                    error_msg,
                    pipeline_start.elapsed(),
                ));
            }

            match stage.execute(context) {
                Ok(()) => {
                    if let Err(e) = stage.post_execute(context) {
                        let error_msg = format!("Post-execute failed: {}", e);
                        error!(stage = %stage_name, error = %e, "Stage post-execute failed");
                        stage_results.push(StageResult::failure(
                            stage.kind(),
                            stage_name,
                            error_msg.clone(),
                            stage_start.elapsed(),
                        ));
                        return Ok(PipelineResult::failure(
                            &self.name,
                            stage_results,
                            error_msg,
                            pipeline_start.elapsed(),
                        ));
                    }

                    let duration = stage_start.elapsed();
                    info!(
                        stage = %stage_name,
                        duration_ms = duration.as_millis() as u64,
                        "Stage completed"
                    );
                    stage_results.push(StageResult::success(stage.kind(), stage_name, duration));
                }
                Err(e) => {
                    let error_msg = e.to_string();
                    error!(stage = %stage_name, error = %error_msg, "Stage failed");
                    stage_results.push(StageResult::failure(
                        stage.kind(),
                        stage_name,
                        error_msg.clone(),
                        stage_start.elapsed(),
                    ));
                    return Ok(PipelineResult::failure(
                        &self.name,
                        stage_results,
                        error_msg,
                        pipeline_start.elapsed(),
                    ));
                }
            }
        }

        let total_duration = pipeline_start.elapsed();
        info!(
            pipeline = %self.name,
            duration_ms = total_duration.as_millis() as u64,
            "Pipeline completed"
        );

        Ok(PipelineResult::success(
            &self.name,
            stage_results,
            total_duration,
        ))
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder {
    name: String,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Add a stage to the pipeline
    pub fn add_stage<S: PipelineStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a boxed stage to the pipeline
    pub fn add_boxed_stage(mut self, stage: Box<dyn PipelineStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            name: self.name,
            stages: self.stages,
        }
    }
}
