//! Stage definitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Builtin maintenance stages, in their default pipeline order.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStage {
    /// `<tool> clean`
    Clean,

    /// `<tool> check`
    Check,

    /// `<tool> fix --allow-dirty --allow-staged`
    Fix,

    /// `<tool> fmt`
    Fmt,

    /// `<tool> update`
    Update,

    /// `<tool> metadata --format-version 1`
    Metadata,
}

impl BuiltinStage {
    pub const ALL: [BuiltinStage; 6] = [
        BuiltinStage::Clean,
        BuiltinStage::Check,
        BuiltinStage::Fix,
        BuiltinStage::Fmt,
        BuiltinStage::Update,
        BuiltinStage::Metadata,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinStage::Clean => "clean",
            BuiltinStage::Check => "check",
            BuiltinStage::Fix => "fix",
            BuiltinStage::Fmt => "fmt",
            BuiltinStage::Update => "update",
            BuiltinStage::Metadata => "metadata",
        }
    }

    /// Arguments passed to the tool for this stage.
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            BuiltinStage::Clean => &["clean"],
            BuiltinStage::Check => &["check"],
            BuiltinStage::Fix => &["fix", "--allow-dirty", "--allow-staged"],
            BuiltinStage::Fmt => &["fmt"],
            BuiltinStage::Update => &["update"],
            BuiltinStage::Metadata => &["metadata", "--format-version", "1"],
        }
    }
}

impl FromStr for BuiltinStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        BuiltinStage::ALL
            .into_iter()
            .find(|stage| stage.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = BuiltinStage::ALL.iter().map(|s| s.name()).collect();
                format!("unknown stage '{}' (expected one of: {})", s.trim(), known.join(", "))
            })
    }
}

impl fmt::Display for BuiltinStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of the pipeline: a name and the command it runs in a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDefinition {
    pub name: String,

    /// Executable; looked up on `PATH` when not a path.
    pub program: String,

    pub args: Vec<String>,

    /// `None` waits for the command forever.
    pub timeout: Option<Duration>,
}

impl StageDefinition {
    pub fn builtin(stage: BuiltinStage, tool: &str, timeout: Option<Duration>) -> Self {
        Self {
            name: stage.name().to_string(),
            program: tool.to_string(),
            args: stage.args().iter().map(|a| a.to_string()).collect(),
            timeout,
        }
    }

    pub fn custom<I, S>(name: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The command as a single display string, e.g. `cargo fmt`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_stage_names_round_trip_through_from_str() {
        for stage in BuiltinStage::ALL {
            assert_eq!(stage.name().parse::<BuiltinStage>(), Ok(stage));
        }
        assert_eq!(" FMT ".parse::<BuiltinStage>(), Ok(BuiltinStage::Fmt));
    }

    #[test]
    fn test_unknown_stage_lists_known_ones() {
        let err = "clippy".parse::<BuiltinStage>().unwrap_err();
        assert!(err.contains("clippy"));
        assert!(err.contains("metadata"));
    }

    #[test]
    fn test_builtin_definition_commands() {
        let fix = StageDefinition::builtin(BuiltinStage::Fix, "cargo", None);
        assert_eq!(fix.name, "fix");
        assert_eq!(fix.command_line(), "cargo fix --allow-dirty --allow-staged");

        let meta = StageDefinition::builtin(BuiltinStage::Metadata, "cargo", Some(Duration::from_secs(5)));
        assert_eq!(meta.command_line(), "cargo metadata --format-version 1");
        assert_eq!(meta.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_custom_stage() {
        let stage = StageDefinition::custom("lint", "sh", ["-c", "exit 0"]);
        assert_eq!(stage.name, "lint");
        assert_eq!(stage.args, vec!["-c", "exit 0"]);
        assert!(stage.timeout.is_none());
    }
}
