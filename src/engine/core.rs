// src/engine/core.rs

//! Pure core state machine.
//!
//! Consumes [`RunEvent`]s and answers each with exactly one
//! [`CoreCommand`] for the IO shell. No Tokio, no processes, no
//! filesystem: the fail-fast contract is decided here and unit tested
//! directly.

use tracing::{debug, info, warn};

use crate::discovery::BuildUnit;
use crate::engine::{RunEvent, RunReport, StageJob, StageOutcome};
use crate::errors::{Result, UnitpipeError};
use crate::ignore_list::IgnoreSet;
use crate::pipeline::Pipeline;

/// Where the run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Discovering,
    Running { unit: usize, stage: usize },
    Completed,
    Aborted,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Completed | RunPhase::Aborted)
    }
}

/// What the shell should do next.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Run unit discovery and report back with `UnitsDiscovered`.
    Discover,
    /// Execute this stage and report back with `StageFinished`.
    RunStage(StageJob),
    /// The run is over.
    Finish(RunReport),
}

#[derive(Debug)]
pub struct CoreRuntime {
    pipeline: Pipeline,
    ignore: IgnoreSet,
    units: Vec<BuildUnit>,
    skipped: Vec<BuildUnit>,
    phase: RunPhase,
    stages_run: usize,
}

impl CoreRuntime {
    pub fn new(pipeline: Pipeline, ignore: IgnoreSet) -> Self {
        Self {
            pipeline,
            ignore,
            units: Vec::new(),
            skipped: Vec::new(),
            phase: RunPhase::Idle,
            stages_run: 0,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Units that survived the ignore filter, in run order.
    pub fn units(&self) -> &[BuildUnit] {
        &self.units
    }

    /// Units dropped by the ignore registry.
    pub fn skipped(&self) -> &[BuildUnit] {
        &self.skipped
    }

    pub fn step(&mut self, event: RunEvent) -> Result<CoreCommand> {
        match (self.phase, event) {
            (RunPhase::Idle, RunEvent::Start) => {
                self.phase = RunPhase::Discovering;
                Ok(CoreCommand::Discover)
            }
            (RunPhase::Discovering, RunEvent::UnitsDiscovered(units)) => Ok(self.on_discovered(units)),
            (RunPhase::Running { unit, stage }, RunEvent::StageFinished(outcome)) => {
                Ok(self.on_stage_finished(unit, stage, outcome))
            }
            (phase, event) => Err(UnitpipeError::Engine(format!(
                "unexpected event {event:?} in phase {phase:?}"
            ))),
        }
    }

    fn on_discovered(&mut self, discovered: Vec<BuildUnit>) -> CoreCommand {
        let (skipped, units): (Vec<_>, Vec<_>) =
            discovered.into_iter().partition(|u| self.ignore.is_ignored(u));
        for unit in &skipped {
            info!(unit = %unit, "skipping ignored unit");
        }
        self.skipped = skipped;
        self.units = units;

        if self.units.is_empty() || self.pipeline.is_empty() {
            warn!(
                units = self.units.len(),
                stages = self.pipeline.len(),
                "nothing to run"
            );
            return self.complete();
        }

        self.schedule(0, 0)
    }

    fn on_stage_finished(&mut self, unit: usize, stage: usize, outcome: StageOutcome) -> CoreCommand {
        self.stages_run += 1;

        if !outcome.is_success() {
            self.phase = RunPhase::Aborted;
            return CoreCommand::Finish(RunReport::Aborted {
                unit: self.units[unit].clone(),
                stage: self.pipeline.stages()[stage].name.clone(),
                outcome,
                stages_run: self.stages_run,
            });
        }

        if stage + 1 < self.pipeline.len() {
            self.schedule(unit, stage + 1)
        } else if unit + 1 < self.units.len() {
            debug!(unit = %self.units[unit], "all stages passed for unit");
            self.schedule(unit + 1, 0)
        } else {
            self.complete()
        }
    }

    fn schedule(&mut self, unit: usize, stage: usize) -> CoreCommand {
        self.phase = RunPhase::Running { unit, stage };
        CoreCommand::RunStage(StageJob {
            unit: self.units[unit].clone(),
            stage: self.pipeline.stages()[stage].clone(),
        })
    }

    fn complete(&mut self) -> CoreCommand {
        self.phase = RunPhase::Completed;
        CoreCommand::Finish(RunReport::Completed {
            units: self.units.len(),
            stages_run: self.stages_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StageDefinition;
    use std::path::Path;

    fn units(keys: &[&str]) -> Vec<BuildUnit> {
        keys.iter()
            .map(|k| BuildUnit::new(Path::new("/repo"), Path::new(k), "Cargo.toml"))
            .collect()
    }

    fn pipeline(names: &[&str]) -> Pipeline {
        Pipeline::new(names.iter().map(|n| StageDefinition::custom(*n, "true", Vec::<String>::new())).collect())
    }

    fn expect_job(cmd: CoreCommand) -> (String, String) {
        match cmd {
            CoreCommand::RunStage(job) => (job.unit.key().to_string(), job.stage.name),
            other => panic!("expected RunStage, got {other:?}"),
        }
    }

    #[test]
    fn walks_units_then_stages_in_order() {
        let mut core = CoreRuntime::new(pipeline(&["clean", "check"]), IgnoreSet::new());
        assert!(matches!(core.step(RunEvent::Start).unwrap(), CoreCommand::Discover));
        assert_eq!(core.phase(), RunPhase::Discovering);

        let mut order = vec![expect_job(core.step(RunEvent::UnitsDiscovered(units(&["a", "b"]))).unwrap())];
        for _ in 0..3 {
            order.push(expect_job(core.step(RunEvent::StageFinished(StageOutcome::Success)).unwrap()));
        }
        let last = core.step(RunEvent::StageFinished(StageOutcome::Success)).unwrap();

        let expected: Vec<(String, String)> = [("a", "clean"), ("a", "check"), ("b", "clean"), ("b", "check")]
            .iter()
            .map(|(u, s)| (u.to_string(), s.to_string()))
            .collect();
        assert_eq!(order, expected);
        assert!(matches!(
            last,
            CoreCommand::Finish(RunReport::Completed { units: 2, stages_run: 4 })
        ));
        assert_eq!(core.phase(), RunPhase::Completed);
    }

    #[test]
    fn first_failure_aborts_everything() {
        let mut core = CoreRuntime::new(pipeline(&["clean", "check", "fmt"]), IgnoreSet::new());
        core.step(RunEvent::Start).unwrap();
        core.step(RunEvent::UnitsDiscovered(units(&["x", "y"]))).unwrap();
        core.step(RunEvent::StageFinished(StageOutcome::Success)).unwrap();

        match core.step(RunEvent::StageFinished(StageOutcome::Failed(101))).unwrap() {
            CoreCommand::Finish(RunReport::Aborted { unit, stage, outcome, stages_run }) => {
                assert_eq!(unit.key(), "x");
                assert_eq!(stage, "check");
                assert_eq!(outcome, StageOutcome::Failed(101));
                assert_eq!(stages_run, 2);
            }
            other => panic!("expected abort, got {other:?}"),
        }
        assert_eq!(core.phase(), RunPhase::Aborted);
        assert!(core.phase().is_terminal());

        // A terminal core refuses further work.
        assert!(core.step(RunEvent::StageFinished(StageOutcome::Success)).is_err());
    }

    #[test]
    fn ignored_units_are_filtered_before_any_stage() {
        let mut core = CoreRuntime::new(pipeline(&["check"]), IgnoreSet::parse("a\n# b\n"));
        core.step(RunEvent::Start).unwrap();

        let first = expect_job(core.step(RunEvent::UnitsDiscovered(units(&["a", "b"]))).unwrap());
        assert_eq!(first, ("b".to_string(), "check".to_string()));
        assert_eq!(core.skipped().len(), 1);
        assert_eq!(core.units().len(), 1);
    }

    #[test]
    fn nothing_to_run_completes_immediately() {
        let mut core = CoreRuntime::new(pipeline(&["check"]), IgnoreSet::parse("a\n"));
        core.step(RunEvent::Start).unwrap();
        let cmd = core.step(RunEvent::UnitsDiscovered(units(&["a"]))).unwrap();
        assert!(matches!(
            cmd,
            CoreCommand::Finish(RunReport::Completed { units: 0, stages_run: 0 })
        ));
    }

    #[test]
    fn events_out_of_order_are_rejected() {
        let mut core = CoreRuntime::new(pipeline(&["check"]), IgnoreSet::new());
        assert!(core.step(RunEvent::StageFinished(StageOutcome::Success)).is_err());
        assert_eq!(core.phase(), RunPhase::Idle);
    }
}
