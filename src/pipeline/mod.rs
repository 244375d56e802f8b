// src/pipeline/mod.rs

//! The ordered stage pipeline.
//!
//! Stage commands are fixed in [`BuiltinStage`]; configuration only picks
//! which stages run, in which order, with which tool and timeout.

pub mod stage;

use std::time::Duration;

pub use stage::{BuiltinStage, StageDefinition};

/// Default build tool driving the builtin stages.
pub const DEFAULT_TOOL: &str = "cargo";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<StageDefinition>,
}

impl Pipeline {
    pub fn new(stages: Vec<StageDefinition>) -> Self {
        Self { stages }
    }

    pub fn from_builtin(tool: &str, stages: &[BuiltinStage], timeout: Option<Duration>) -> Self {
        Self::new(
            stages
                .iter()
                .map(|stage| StageDefinition::builtin(*stage, tool, timeout))
                .collect(),
        )
    }

    /// All builtin stages, driven by `cargo`, no timeout.
    pub fn default_stages() -> Self {
        Self::from_builtin(DEFAULT_TOOL, &BuiltinStage::ALL, None)
    }

    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_order() {
        let pipeline = Pipeline::default_stages();
        assert_eq!(
            pipeline.names().collect::<Vec<_>>(),
            vec!["clean", "check", "fix", "fmt", "update", "metadata"]
        );
        assert!(pipeline.stages().iter().all(|s| s.program == "cargo"));
    }

    #[test]
    fn from_builtin_keeps_given_order_and_timeout() {
        let pipeline = Pipeline::from_builtin(
            "cargo",
            &[BuiltinStage::Fmt, BuiltinStage::Clean],
            Some(Duration::from_secs(60)),
        );
        assert_eq!(pipeline.names().collect::<Vec<_>>(), vec!["fmt", "clean"]);
        assert_eq!(pipeline.stages()[1].timeout, Some(Duration::from_secs(60)));
    }
}
