// src/engine/mod.rs

//! Execution engine for unitpipe.
//!
//! The pure state machine lives in [`core`]; the async/IO shell that runs
//! discovery, executes stages, prints banners and fires the notifier is in
//! [`runtime`].
//!
//! ```text
//! Idle -> Discovering -> Running{unit, stage} ... -> Completed | Aborted
//! ```

use std::fmt;
use std::time::Duration;

use crate::discovery::BuildUnit;
use crate::pipeline::StageDefinition;

pub mod core;
pub mod runtime;

pub use core::{CoreCommand, CoreRuntime, RunPhase};
pub use runtime::Runtime;

/// Exit status of a run aborted by a failing stage.
pub const EXIT_ABORTED: u8 = 1;

/// Exit status when configuration or discovery fails before any stage runs.
pub const EXIT_ERROR: u8 = 2;

/// Terminal outcome of one stage invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Success,
    /// Non-zero exit; `-1` when the process was killed by a signal.
    Failed(i32),
    /// The command could not be started (or waited on).
    LaunchFailed(String),
    /// The stage ran past its timeout and was killed.
    TimedOut(Duration),
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success)
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Success => f.write_str("success"),
            StageOutcome::Failed(code) => write!(f, "exit code {code}"),
            StageOutcome::LaunchFailed(reason) => write!(f, "failed to launch: {reason}"),
            StageOutcome::TimedOut(limit) => write!(f, "timed out after {limit:?}"),
        }
    }
}

/// One (unit, stage) pair handed to the executor.
#[derive(Debug, Clone)]
pub struct StageJob {
    pub unit: BuildUnit,
    pub stage: StageDefinition,
}

/// Events fed into the core.
#[derive(Debug, Clone)]
pub enum RunEvent {
    Start,
    UnitsDiscovered(Vec<BuildUnit>),
    StageFinished(StageOutcome),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    /// Every stage of every surviving unit succeeded.
    Completed { units: usize, stages_run: usize },
    /// The first failure; nothing ran after it.
    Aborted {
        unit: BuildUnit,
        stage: String,
        outcome: StageOutcome,
        stages_run: usize,
    },
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        matches!(self, RunReport::Completed { .. })
    }

    pub fn stages_run(&self) -> usize {
        match self {
            RunReport::Completed { stages_run, .. } | RunReport::Aborted { stages_run, .. } => {
                *stages_run
            }
        }
    }

    /// Process exit status for this report: `0` or [`EXIT_ABORTED`].
    pub fn exit_code(&self) -> u8 {
        match self {
            RunReport::Completed { .. } => 0,
            RunReport::Aborted { .. } => EXIT_ABORTED,
        }
    }
}
