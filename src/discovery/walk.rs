// src/discovery/walk.rs

//! Filesystem-walk discovery.
//!
//! Depth-first, parent before child, siblings in file-name order. A
//! directory whose bare name is excluded is never entered. Every other
//! directory is recorded as a unit when it directly holds the manifest and
//! is then descended into, so nested units are all reported.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result as AnyResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::discovery::unit::BuildUnit;
use crate::errors::{Result, UnitpipeError};
use crate::fs::FileSystem;

/// Directory names that never hold build units of their own.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "target",
    "node_modules",
    "vendor",
    "dist",
    "build",
    ".cargo",
    ".idea",
    ".vscode",
];

/// Compiled set of excluded bare directory names.
///
/// Entries are glob patterns matched against a single path component, so
/// `".*"` excludes every hidden directory and `"target"` only that name.
#[derive(Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionSet")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ExclusionSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> AnyResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for pat in patterns {
            let pat = pat.as_ref();
            let glob = Glob::new(pat).with_context(|| format!("invalid exclusion pattern: {pat}"))?;
            builder.add(glob);
        }
        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            set: builder.build()?,
        })
    }

    pub fn defaults() -> AnyResult<Self> {
        Self::new(DEFAULT_EXCLUDE_DIRS)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.set.is_match(dir_name)
    }
}

/// Walk `root` and return every build unit below it, in discovery order.
///
/// The root itself is never a unit here. A root that cannot be listed is a
/// discovery error; unreadable directories further down are skipped with a
/// warning. Directories are canonicalized before being entered and a
/// canonical path is entered at most once, so symlink loops terminate.
pub fn walk_units(
    fs: &dyn FileSystem,
    root: &Path,
    manifest: &str,
    exclusions: &ExclusionSet,
) -> Result<Vec<BuildUnit>> {
    let root_canon = fs.canonicalize(root).map_err(|e| {
        UnitpipeError::Discovery(format!("cannot resolve root {}: {e:#}", root.display()))
    })?;
    let top = sorted_subdirs(fs, root).map_err(|e| {
        UnitpipeError::Discovery(format!("cannot read root {}: {e:#}", root.display()))
    })?;

    let mut visited: HashSet<PathBuf> = HashSet::from([root_canon]);
    let mut units = Vec::new();
    let mut stack: Vec<PathBuf> = top.into_iter().rev().collect();

    while let Some(dir) = stack.pop() {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if exclusions.is_excluded(&name) {
            debug!(dir = %dir.display(), "skipping excluded directory");
            continue;
        }

        let canonical = match fs.canonicalize(&dir) {
            Ok(c) => c,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot resolve directory; skipping");
                continue;
            }
        };
        if !visited.insert(canonical) {
            debug!(dir = %dir.display(), "directory already visited (symlink); not descending");
            continue;
        }

        if fs.is_file(&dir.join(manifest)) {
            let rel = dir.strip_prefix(root).unwrap_or(&dir);
            let unit = BuildUnit::new(root, rel, manifest);
            debug!(unit = %unit, "found build unit");
            units.push(unit);
        }

        match sorted_subdirs(fs, &dir) {
            Ok(children) => stack.extend(children.into_iter().rev()),
            Err(e) => warn!(dir = %dir.display(), error = %e, "cannot read directory; skipping"),
        }
    }

    Ok(units)
}

fn sorted_subdirs(fs: &dyn FileSystem, dir: &Path) -> AnyResult<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|p| fs.is_dir(p))
        .collect();
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(dirs)
}
