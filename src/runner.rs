//! Assembles and runs the web log pipeline
//!
//! The external scheduler only needs two things from this module: the full
//! five-stage run, and the ability to invoke any single stage on its own.
//! Both operate on a context seeded from the same configuration, so a stage
//! run in isolation sees exactly the paths a full run would hand it.

use tracing::{error, info};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::LogshipResult;
use crate::pipeline::stages::{ArchiveStage, ExtractStage, FilterStage, NotifyStage, ScanStage};
use crate::pipeline::{Pipeline, PipelineContext, PipelineResult, PipelineStage};
use crate::state::{RunState, Stage};

/// Name of the one pipeline this crate runs
pub const PIPELINE_NAME: &str = "process_web_log";

/// Seed a fresh context with the artifact paths and settings from `config`
pub fn seed_context(config: &PipelineConfig) -> PipelineContext {
    let mut context = PipelineContext::new(Uuid::new_v4().to_string());
    context.set_path("log_path", config.log_path());
    context.set_path("extracted_path", config.extracted_path());
    context.set_path("filtered_path", config.filtered_path());
    context.set_path("archive_path", config.archive_path());
    context.set_string("blocked_ip", config.blocked_ip.clone());
    context.set_string("webhook_url", config.webhook_url.clone());
    context.set_number("timeout_secs", config.timeout_secs as f64);
    context
}

fn boxed_stage(stage: Stage) -> Box<dyn PipelineStage> {
    match stage {
        Stage::Checking => Box::new(ScanStage::new()),
        Stage::Extracting => Box::new(ExtractStage::new()),
        Stage::Filtering => Box::new(FilterStage::new()),
        Stage::Archiving => Box::new(ArchiveStage::new()),
        Stage::Notifying => Box::new(NotifyStage::new()),
    }
}

/// Build the full five-stage pipeline
pub fn full_pipeline() -> Pipeline {
    let mut builder = Pipeline::builder(PIPELINE_NAME);
    for stage in Stage::ALL {
        builder = builder.add_boxed_stage(boxed_stage(stage));
    }
    builder.build()
}

/// Build a pipeline holding a single stage, for independent invocation
pub fn stage_pipeline(stage: Stage) -> Pipeline {
    Pipeline::builder(PIPELINE_NAME)
        .add_boxed_stage(boxed_stage(stage))
        .build()
}

/// Run the whole pipeline once and report the terminal run state
///
/// The returned result carries the per-stage outcomes; the run state is the
/// pipeline-level view of the same run (`Succeeded`, or `Failed` naming the
/// stage that stopped it).
pub fn run(config: &PipelineConfig) -> LogshipResult<(PipelineResult, RunState)> {
    config.validate()?;

    let pipeline = full_pipeline();
    let mut context = seed_context(config);
    let result = pipeline.execute(&mut context)?;
    let state = RunState::replay(&result)?;

    match &state {
        RunState::Succeeded => {
            info!(pipeline = PIPELINE_NAME, "Run succeeded");
        }
        RunState::Failed { stage, error } => {
            error!(pipeline = PIPELINE_NAME, stage = %stage, error = %error, "Run failed");
        }
        _ => {}
    }

    Ok((result, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            log_dir: PathBuf::from("/data/weblogs"),
            blocked_ip: "198.46.149.143".to_string(),
            webhook_url: "https://hooks.example.com/abc".to_string(),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_full_pipeline_has_five_stages() {
        let pipeline = full_pipeline();
        assert_eq!(pipeline.stage_count(), 5);
        assert_eq!(pipeline.name(), PIPELINE_NAME);
    }

    #[test]
    fn test_stage_pipeline_has_one_stage() {
        for stage in Stage::ALL {
            assert_eq!(stage_pipeline(stage).stage_count(), 1);
        }
    }

    #[test]
    fn test_seed_context_carries_config() {
        let config = test_config();
        let context = seed_context(&config);

        assert_eq!(
            context.get_path("log_path").unwrap(),
            PathBuf::from("/data/weblogs/log.txt")
        );
        assert_eq!(
            context.get_path("archive_path").unwrap(),
            PathBuf::from("/data/weblogs/weblog.tar")
        );
        assert_eq!(
            context.get_string("blocked_ip").unwrap(),
            "198.46.149.143"
        );
        assert_eq!(context.get_number("timeout_secs").unwrap(), 10.0);
    }

    #[test]
    fn test_run_rejects_incomplete_config() {
        let mut config = test_config();
        config.webhook_url = String::new();

        let result = run(&config);
        assert!(result.is_err());
    }
}
