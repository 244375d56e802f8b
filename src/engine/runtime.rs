// src/engine/runtime.rs

use std::fmt;
use std::io::{self, Write};

use tracing::{debug, info};

use crate::discovery::Discovery;
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::notifier::Notifier;

use super::core::CoreRuntime;
use super::{CoreCommand, RunEvent, RunReport, StageJob};

/// Drives [`CoreRuntime`]: runs discovery, hands stages to an
/// `ExecutorBackend` one at a time, and prints the console lines.
///
/// Console contract (stdout by default):
/// - `==> [<stage>] <unit>` before every stage;
/// - `!! <stage> failed for <unit>: <outcome>` as the last line on abort;
/// - a one-line summary on completion.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    discovery: Discovery,
    executor: E,
    notifier: Box<dyn Notifier>,
    console: Box<dyn Write + Send>,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("discovery", &self.discovery)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(
        core: CoreRuntime,
        discovery: Discovery,
        executor: E,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            core,
            discovery,
            executor,
            notifier,
            console: Box::new(io::stdout()),
        }
    }

    /// Send banners and the failure line somewhere other than stdout.
    pub fn with_console(mut self, console: Box<dyn Write + Send>) -> Self {
        self.console = console;
        self
    }

    /// Run to completion or to the first failing stage.
    ///
    /// Stage failures come back as `Ok(RunReport::Aborted { .. })`; `Err`
    /// means the run never got going (discovery) or the console broke.
    pub async fn run(mut self) -> Result<RunReport> {
        info!("unitpipe run started");

        let mut command = self.core.step(RunEvent::Start)?;
        loop {
            debug!(phase = ?self.core.phase(), "core issued command");

            let event = match command {
                CoreCommand::Discover => RunEvent::UnitsDiscovered(self.discovery.discover().await?),
                CoreCommand::RunStage(job) => {
                    self.announce(&job)?;
                    RunEvent::StageFinished(self.executor.run_stage(&job).await)
                }
                CoreCommand::Finish(report) => {
                    self.finish(&report).await?;
                    return Ok(report);
                }
            };

            command = self.core.step(event)?;
        }
    }

    fn announce(&mut self, job: &StageJob) -> Result<()> {
        writeln!(self.console, "==> [{}] {}", job.stage.name, job.unit)?;
        self.console.flush()?;
        Ok(())
    }

    async fn finish(&mut self, report: &RunReport) -> Result<()> {
        match report {
            RunReport::Completed { units, stages_run } => {
                info!(units, stages_run, "run completed");
                writeln!(
                    self.console,
                    "unitpipe: completed {stages_run} stage(s) across {units} unit(s)"
                )?;
            }
            RunReport::Aborted { unit, stage, outcome, stages_run } => {
                info!(unit = %unit, stage = %stage, %outcome, stages_run, "run aborted");
                writeln!(self.console, "!! {stage} failed for {unit}: {outcome}")?;
            }
        }
        self.console.flush()?;

        self.notifier.notify(report).await;
        Ok(())
    }
}
