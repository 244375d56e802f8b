// src/discovery/mod.rs

//! Build-unit discovery.
//!
//! - [`unit`] defines [`BuildUnit`] and its normalized identity key.
//! - [`walk`] finds units by walking the filesystem.
//! - [`tracked`] finds units from git's list of tracked manifests.
//!
//! [`Discovery`] picks one strategy per run from its [`DiscoveryConfig`].

pub mod tracked;
pub mod unit;
pub mod walk;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::errors::Result;
use crate::fs::FileSystem;
pub use crate::types::DiscoveryStrategy;

pub use tracked::{parse_tracked_listing, tracked_units};
pub use unit::{normalize_key, BuildUnit};
pub use walk::{walk_units, ExclusionSet, DEFAULT_EXCLUDE_DIRS};

/// Default manifest file name marking a build unit.
pub const DEFAULT_MANIFEST: &str = "Cargo.toml";

/// Default program queried by the tracked strategy.
pub const DEFAULT_VCS_PROGRAM: &str = "git";

/// Everything discovery needs, fixed for the duration of a run.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub root: PathBuf,
    pub strategy: DiscoveryStrategy,
    pub manifest: String,
    pub exclusions: ExclusionSet,
    pub vcs_program: String,
}

impl DiscoveryConfig {
    /// Walk strategy over `root` with the default manifest and exclusions.
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self {
            root: root.into(),
            strategy: DiscoveryStrategy::default(),
            manifest: DEFAULT_MANIFEST.to_string(),
            exclusions: ExclusionSet::defaults()?,
            vcs_program: DEFAULT_VCS_PROGRAM.to_string(),
        })
    }

    pub fn with_strategy(mut self, strategy: DiscoveryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_manifest(mut self, manifest: impl Into<String>) -> Self {
        self.manifest = manifest.into();
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_vcs_program(mut self, program: impl Into<String>) -> Self {
        self.vcs_program = program.into();
        self
    }
}

/// Produces the ordered sequence of build units for one run.
#[derive(Debug, Clone)]
pub struct Discovery {
    config: DiscoveryConfig,
    fs: Arc<dyn FileSystem>,
}

impl Discovery {
    pub fn new(config: DiscoveryConfig, fs: Arc<dyn FileSystem>) -> Self {
        Self { config, fs }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub async fn discover(&self) -> Result<Vec<BuildUnit>> {
        let cfg = &self.config;
        let units = match cfg.strategy {
            DiscoveryStrategy::Tracked => {
                tracked_units(&cfg.root, &cfg.manifest, &cfg.vcs_program).await?
            }
            DiscoveryStrategy::Walk => {
                walk_units(self.fs.as_ref(), &cfg.root, &cfg.manifest, &cfg.exclusions)?
            }
        };

        info!(
            strategy = %cfg.strategy,
            root = %cfg.root.display(),
            count = units.len(),
            "discovered build units"
        );
        Ok(units)
    }
}
