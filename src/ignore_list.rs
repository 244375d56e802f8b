// src/ignore_list.rs

//! The ignore registry: a denylist of unit paths that never run.
//!
//! File format, one entry per line:
//!
//! ```text
//! # lines starting with '#' are comments
//! crates/legacy
//! tools/experimental/
//! ```
//!
//! Entries are compared with unit keys after [`normalize_key`], so
//! `./crates/legacy/` and `crates/legacy` are the same entry. Matching is
//! exact: ignoring `crates` does not ignore `crates/a`.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::discovery::{normalize_key, BuildUnit};
use crate::errors::{Result, UnitpipeError};
use crate::fs::FileSystem;

/// Default ignore file, relative to the invocation root.
pub const DEFAULT_IGNORE_FILE: &str = ".unitpipeignore";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    entries: BTreeSet<String>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ignore file at `path`. A missing file is an empty set.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        if !fs.exists(path) {
            debug!(path = %path.display(), "no ignore file; nothing is ignored");
            return Ok(Self::new());
        }

        let contents = fs.read_to_string(path).map_err(|e| {
            UnitpipeError::ConfigError(format!("reading ignore file {}: {e:#}", path.display()))
        })?;
        let set = Self::parse(&contents);
        debug!(path = %path.display(), entries = set.len(), "loaded ignore file");
        Ok(set)
    }

    /// Parse ignore-file contents. Blank lines and `#` comments are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut set = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            set.insert(line);
        }
        set
    }

    pub fn insert(&mut self, entry: &str) {
        self.entries.insert(normalize_key(entry));
    }

    /// Whether the (possibly unnormalized) unit path is ignored.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains(&normalize_key(path))
    }

    pub fn is_ignored(&self, unit: &BuildUnit) -> bool {
        self.entries.contains(unit.key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Normalized entries in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
