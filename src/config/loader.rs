// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Default config file name, looked up in the run root.
pub const DEFAULT_CONFIG_FILE: &str = "Unitpipe.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] or
/// `ConfigFile::try_from` for the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the raw configuration for a run rooted at `root`.
///
/// - An explicit path must exist.
/// - Otherwise `Unitpipe.toml` in `root` is used when present, and the
///   built-in defaults when it is not.
pub fn load_raw(root: &Path, explicit: Option<&Path>) -> Result<RawConfigFile> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading explicit config file");
        return load_from_path(path);
    }

    let path = default_config_path(root);
    if path.is_file() {
        debug!(path = %path.display(), "loading config file");
        load_from_path(&path)
    } else {
        debug!(path = %path.display(), "no config file; using defaults");
        Ok(RawConfigFile::default())
    }
}

/// `Unitpipe.toml` inside `root`.
fn default_config_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_CONFIG_FILE)
}
