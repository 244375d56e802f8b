// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime hands each [`StageJob`] to an `ExecutorBackend` and awaits
//! the [`StageOutcome`] before deciding what to do next. Production uses
//! [`RealExecutorBackend`]; tests provide a backend that records the jobs
//! and returns scripted outcomes without spawning anything.

use std::future::Future;
use std::pin::Pin;

use crate::engine::{StageJob, StageOutcome};

use super::stage_runner::run_stage;

/// Trait abstracting how a stage is executed.
///
/// Implementations must not return before the stage has finished: the
/// engine relies on this to keep stages strictly sequential.
pub trait ExecutorBackend: Send {
    fn run_stage<'a>(
        &'a mut self,
        job: &'a StageJob,
    ) -> Pin<Box<dyn Future<Output = StageOutcome> + Send + 'a>>;
}

/// Real executor backend: spawns the stage command as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealExecutorBackend;

impl RealExecutorBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn run_stage<'a>(
        &'a mut self,
        job: &'a StageJob,
    ) -> Pin<Box<dyn Future<Output = StageOutcome> + Send + 'a>> {
        Box::pin(run_stage(job))
    }
}
