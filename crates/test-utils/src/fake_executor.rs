use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use unitpipe::engine::{StageJob, StageOutcome};
use unitpipe::exec::ExecutorBackend;

/// `(unit key, stage name)` pairs in the order they were run.
pub type Invocations = Arc<Mutex<Vec<(String, String)>>>;

/// A fake executor that:
/// - records which (unit, stage) pairs were "run"
/// - returns `Success` unless an outcome was scripted for that pair.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    invoked: Invocations,
    scripted: HashMap<(String, String), StageOutcome>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `stage` of `unit` finish with `outcome`.
    pub fn with_outcome(mut self, unit: &str, stage: &str, outcome: StageOutcome) -> Self {
        self.scripted
            .insert((unit.to_string(), stage.to_string()), outcome);
        self
    }

    /// Shorthand for a non-zero exit.
    pub fn failing_at(self, unit: &str, stage: &str, code: i32) -> Self {
        self.with_outcome(unit, stage, StageOutcome::Failed(code))
    }

    /// Handle to the invocation log; stays valid after the executor moves.
    pub fn invocations(&self) -> Invocations {
        Arc::clone(&self.invoked)
    }
}

impl ExecutorBackend for FakeExecutor {
    fn run_stage<'a>(
        &'a mut self,
        job: &'a StageJob,
    ) -> Pin<Box<dyn Future<Output = StageOutcome> + Send + 'a>> {
        let key = (job.unit.key().to_string(), job.stage.name.clone());
        self.invoked.lock().unwrap().push(key.clone());
        let outcome = self
            .scripted
            .get(&key)
            .cloned()
            .unwrap_or(StageOutcome::Success);

        Box::pin(async move { outcome })
    }
}
