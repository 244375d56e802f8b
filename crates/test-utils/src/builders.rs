#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use unitpipe::discovery::{Discovery, DiscoveryConfig, ExclusionSet};
use unitpipe::engine::{CoreRuntime, Runtime};
use unitpipe::exec::ExecutorBackend;
use unitpipe::fs::mock::MockFileSystem;
use unitpipe::fs::FileSystem;
use unitpipe::ignore_list::IgnoreSet;
use unitpipe::notifier::Notifier;
use unitpipe::pipeline::{Pipeline, StageDefinition};

use crate::console::SharedBuffer;

pub const TEST_ROOT: &str = "repo";
pub const TEST_MANIFEST: &str = "Cargo.toml";

/// Builder for an in-memory monorepo rooted at [`TEST_ROOT`].
pub struct UnitTreeBuilder {
    fs: MockFileSystem,
    root: PathBuf,
}

impl UnitTreeBuilder {
    pub fn new() -> Self {
        let fs = MockFileSystem::new();
        fs.add_dir(TEST_ROOT);
        Self {
            fs,
            root: PathBuf::from(TEST_ROOT),
        }
    }

    /// A directory holding a manifest.
    pub fn unit(self, rel: &str) -> Self {
        self.fs
            .add_file(self.root.join(rel).join(TEST_MANIFEST), "[package]\n");
        self
    }

    /// A plain directory.
    pub fn dir(self, rel: &str) -> Self {
        self.fs.add_dir(self.root.join(rel));
        self
    }

    pub fn file(self, rel: &str, contents: &str) -> Self {
        self.fs.add_file(self.root.join(rel), contents);
        self
    }

    /// Symlink at `rel` whose target is relative to the link's directory.
    pub fn symlink(self, rel: &str, target: &str) -> Self {
        self.fs.add_symlink(self.root.join(rel), target);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build(self) -> MockFileSystem {
        self.fs
    }
}

impl Default for UnitTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline of named stages that would run `true` if executed for real.
pub fn pipeline_of(names: &[&str]) -> Pipeline {
    Pipeline::new(
        names
            .iter()
            .map(|name| StageDefinition::custom(*name, "true", Vec::<String>::new()))
            .collect(),
    )
}

/// Walk discovery over `fs` rooted at [`TEST_ROOT`].
pub fn walk_discovery(fs: MockFileSystem, exclude: &[&str]) -> Discovery {
    let exclusions = ExclusionSet::new(exclude).expect("valid exclusion patterns");
    let config = DiscoveryConfig::new(TEST_ROOT)
        .expect("default discovery config")
        .with_exclusions(exclusions);
    let fs: Arc<dyn FileSystem> = Arc::new(fs);
    Discovery::new(config, fs)
}

/// Runtime over a mock tree with a fake executor, printing into `console`.
pub fn runtime_for<E: ExecutorBackend>(
    fs: MockFileSystem,
    pipeline: Pipeline,
    ignore: IgnoreSet,
    executor: E,
    notifier: Box<dyn Notifier>,
    console: SharedBuffer,
) -> Runtime<E> {
    let discovery = walk_discovery(fs, &["vendor", "target", ".git"]);
    Runtime::new(CoreRuntime::new(pipeline, ignore), discovery, executor, notifier)
        .with_console(Box::new(console))
}
