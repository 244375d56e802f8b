// src/discovery/unit.rs

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A directory recognised as an independent project by its manifest file.
///
/// Identity is the normalized directory path relative to the discovery
/// root (see [`normalize_key`]); two units with the same key are the same
/// unit regardless of how their paths were spelled.
#[derive(Debug, Clone)]
pub struct BuildUnit {
    dir: PathBuf,
    manifest: PathBuf,
    key: String,
}

impl BuildUnit {
    /// Build a unit from a directory relative to `root`.
    pub fn new(root: &Path, rel_dir: &Path, manifest_name: &str) -> Self {
        let key = normalize_key(&rel_dir.to_string_lossy());
        let dir = if key == "." {
            root.to_path_buf()
        } else {
            root.join(&key)
        };
        let manifest = dir.join(manifest_name);
        Self { dir, manifest, key }
    }

    /// Directory the stages run in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The manifest file that qualified this directory.
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Normalized path relative to the discovery root, e.g. `"a/b"` or `"."`.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for BuildUnit {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for BuildUnit {}

impl Hash for BuildUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for BuildUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Normalize a relative unit path into its identity key.
///
/// - `/` and `\` are both separators; repeated separators collapse.
/// - `.` segments vanish and `..` pops the previous segment.
/// - An empty result is `"."` (the root itself).
/// - A leading `/` is kept, so absolute paths never equal relative ones.
pub fn normalize_key(raw: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in raw.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            p => parts.push(p),
        }
    }

    let absolute = raw.starts_with('/');
    match (absolute, parts.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", parts.join("/")),
        (false, true) => ".".to_string(),
        (false, false) => parts.join("/"),
    }
}
