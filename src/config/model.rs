// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::discovery::{DiscoveryConfig, ExclusionSet, DEFAULT_EXCLUDE_DIRS, DEFAULT_MANIFEST, DEFAULT_VCS_PROGRAM};
use crate::ignore_list::DEFAULT_IGNORE_FILE;
use crate::pipeline::{BuiltinStage, Pipeline, DEFAULT_TOOL};
use crate::types::DiscoveryStrategy;

/// Configuration exactly as read from `Unitpipe.toml`.
///
/// ```toml
/// [discovery]
/// strategy = "walk"
/// manifest = "Cargo.toml"
/// exclude_dirs = ["target", ".git"]
/// ignore_file = ".unitpipeignore"
///
/// [pipeline]
/// tool = "cargo"
/// stages = ["clean", "check", "fmt"]
/// stage_timeout = "20m"
///
/// [notify]
/// enabled = false
/// ```
///
/// Every section and key is optional. Turn it into a [`ConfigFile`] with
/// `ConfigFile::try_from`, which validates it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub discovery: DiscoverySection,

    #[serde(default)]
    pub pipeline: PipelineSection,

    #[serde(default)]
    pub notify: NotifySection,
}

/// `[discovery]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySection {
    #[serde(default)]
    pub strategy: DiscoveryStrategy,

    /// File name whose presence marks a build unit.
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Bare directory names (globs) the walk never enters.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Ignore file, relative to the root unless absolute.
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Program queried by the `tracked` strategy.
    #[serde(default = "default_vcs_program")]
    pub vcs_program: String,
}

fn default_manifest() -> String {
    DEFAULT_MANIFEST.to_string()
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect()
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

fn default_vcs_program() -> String {
    DEFAULT_VCS_PROGRAM.to_string()
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            strategy: DiscoveryStrategy::default(),
            manifest: default_manifest(),
            exclude_dirs: default_exclude_dirs(),
            ignore_file: default_ignore_file(),
            vcs_program: default_vcs_program(),
        }
    }
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSection {
    /// Executable that runs every builtin stage.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Builtin stage names, in run order.
    #[serde(default = "default_stages")]
    pub stages: Vec<String>,

    /// Per-stage timeout such as `"30m"`; no timeout when absent.
    #[serde(default)]
    pub stage_timeout: Option<String>,
}

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}

fn default_stages() -> Vec<String> {
    BuiltinStage::ALL.iter().map(|s| s.name().to_string()).collect()
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            stages: default_stages(),
            stage_timeout: None,
        }
    }
}

/// `[notify]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    #[serde(default = "default_notify_enabled")]
    pub enabled: bool,
}

fn default_notify_enabled() -> bool {
    true
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            enabled: default_notify_enabled(),
        }
    }
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>`, so every value in
/// here has already been checked.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    discovery: DiscoverySection,
    exclusions: ExclusionSet,
    tool: String,
    stages: Vec<BuiltinStage>,
    stage_timeout: Option<Duration>,
    notify: bool,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        discovery: DiscoverySection,
        exclusions: ExclusionSet,
        tool: String,
        stages: Vec<BuiltinStage>,
        stage_timeout: Option<Duration>,
        notify: bool,
    ) -> Self {
        Self {
            discovery,
            exclusions,
            tool,
            stages,
            stage_timeout,
            notify,
        }
    }

    pub fn discovery_section(&self) -> &DiscoverySection {
        &self.discovery
    }

    pub fn strategy(&self) -> DiscoveryStrategy {
        self.discovery.strategy
    }

    pub fn manifest(&self) -> &str {
        &self.discovery.manifest
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn stages(&self) -> &[BuiltinStage] {
        &self.stages
    }

    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout
    }

    pub fn notify_enabled(&self) -> bool {
        self.notify
    }

    /// Ignore file location for a run rooted at `root`.
    pub fn ignore_file_path(&self, root: &Path) -> PathBuf {
        root.join(&self.discovery.ignore_file)
    }

    pub fn discovery_config(&self, root: &Path) -> DiscoveryConfig {
        DiscoveryConfig {
            root: root.to_path_buf(),
            strategy: self.discovery.strategy,
            manifest: self.discovery.manifest.clone(),
            exclusions: self.exclusions.clone(),
            vcs_program: self.discovery.vcs_program.clone(),
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_builtin(&self.tool, &self.stages, self.stage_timeout)
    }
}
