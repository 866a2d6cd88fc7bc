//! Pipeline-level run state
//!
//! One run walks a fixed chain: `Idle` → `Running(Checking)` →
//! `Running(Extracting)` → `Running(Filtering)` → `Running(Archiving)` →
//! `Running(Notifying)` → `Succeeded`. A stage error moves the run to
//! `Failed { stage, error }` instead. `Succeeded` and `Failed` are terminal;
//! a re-run starts over from `Idle`. Transitions are checked at runtime and
//! an out-of-order advance is an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LogshipError, LogshipResult};
use crate::pipeline::PipelineResult;

/// The five pipeline stages, in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Checking,
    Extracting,
    Filtering,
    Archiving,
    Notifying,
}

impl Stage {
    /// All stages, in execution order
    pub const ALL: [Stage; 5] = [
        Stage::Checking,
        Stage::Extracting,
        Stage::Filtering,
        Stage::Archiving,
        Stage::Notifying,
    ];

    /// The stage that follows this one, if any
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Checking => Some(Stage::Extracting),
            Stage::Extracting => Some(Stage::Filtering),
            Stage::Filtering => Some(Stage::Archiving),
            Stage::Archiving => Some(Stage::Notifying),
            Stage::Notifying => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Checking => "Checking",
            Stage::Extracting => "Extracting",
            Stage::Filtering => "Filtering",
            Stage::Archiving => "Archiving",
            Stage::Notifying => "Notifying",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    /// No stage has started yet
    Idle,

    /// The named stage is executing
    Running(Stage),

    /// All five stages completed
    Succeeded,

    /// The named stage raised an error; later stages never ran
    Failed { stage: Stage, error: String },
}

impl RunState {
    /// Move to the next state in the chain
    ///
    /// From `Idle` the run enters `Running(Checking)`; from the last stage it
    /// enters `Succeeded`. Terminal states cannot advance.
    pub fn advance(self) -> LogshipResult<RunState> {
        match self {
            RunState::Idle => Ok(RunState::Running(Stage::Checking)),
            RunState::Running(stage) => match stage.next() {
                Some(next) => Ok(RunState::Running(next)),
                None => Ok(RunState::Succeeded),
            },
            other => Err(LogshipError::InvalidStateTransition(format!(
                "cannot advance from {} state",
                other.state_name()
            ))),
        }
    }

    /// Mark the run failed at the current stage
    ///
    /// Failing from `Idle` pins the failure on the first stage. Terminal
    /// states are left unchanged.
    pub fn fail(self, error: impl Into<String>) -> RunState {
        match self {
            RunState::Idle => RunState::Failed {
                stage: Stage::Checking,
                error: error.into(),
            },
            RunState::Running(stage) => RunState::Failed {
                stage,
                error: error.into(),
            },
            terminal => terminal,
        }
    }

    /// Get the current state as a string
    pub fn state_name(&self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::Running(_) => "Running",
            RunState::Succeeded => "Succeeded",
            RunState::Failed { .. } => "Failed",
        }
    }

    /// Whether the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed { .. })
    }

    /// Get the error message if failed
    pub fn error(&self) -> Option<&str> {
        match self {
            RunState::Failed { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }

    /// Derive the terminal state of a full run from the executor's result
    ///
    /// The stage results must follow the chain from `Checking` onward; a
    /// result from a partial pipeline is rejected rather than misreported.
    pub fn replay(result: &PipelineResult) -> LogshipResult<RunState> {
        let mut state = RunState::Idle;
        for stage_result in &result.stage_results {
            state = state.advance()?;
            match &state {
                RunState::Running(stage) if *stage == stage_result.stage => {}
                _ => {
                    return Err(LogshipError::InvalidStateTransition(format!(
                        "stage result for {} does not follow the pipeline chain",
                        stage_result.stage
                    )));
                }
            }
            if !stage_result.success {
                let cause = stage_result
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string());
                return Ok(state.fail(cause));
            }
        }
        if result.success && state == RunState::Running(Stage::Notifying) {
            return Ok(RunState::Succeeded);
        }
        Ok(state)
    }
}
