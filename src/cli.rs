// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every flag except `--root`, `--config`, `--dry-run` and `--log-level`
//! overrides the matching `Unitpipe.toml` value.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::DiscoveryStrategy;

/// Command-line arguments for `unitpipe`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "unitpipe",
    version,
    about = "Run a fail-fast maintenance pipeline over every build unit in a monorepo.",
    long_about = None
)]
pub struct CliArgs {
    /// Root directory to discover build units under.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Path to the config file (TOML).
    ///
    /// Default: `Unitpipe.toml` in the root, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Discovery strategy: `tracked` (git ls-files) or `walk`.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<DiscoveryStrategy>,

    /// Manifest file name marking a build unit.
    #[arg(long, value_name = "NAME")]
    pub manifest: Option<String>,

    /// Ignore file, relative to the root.
    #[arg(long, value_name = "PATH")]
    pub ignore_file: Option<String>,

    /// Stage to run; repeat to build the pipeline in order.
    #[arg(long = "stage", value_name = "NAME")]
    pub stages: Vec<String>,

    /// Executable that runs the stages.
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// Per-stage timeout, e.g. `90s` or `20m`.
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Never play the completion signal.
    #[arg(long)]
    pub no_notify: bool,

    /// Print the discovered units and stage commands without running anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `UNITPIPE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
