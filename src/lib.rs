// src/lib.rs

pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod ignore_list;
pub mod logging;
pub mod notifier;
pub mod pipeline;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_raw, ConfigFile, RawConfigFile};
use crate::discovery::{BuildUnit, Discovery};
use crate::engine::{CoreRuntime, RunReport, Runtime};
use crate::errors::Result;
use crate::exec::RealExecutorBackend;
use crate::fs::{FileSystem, RealFileSystem};
use crate::ignore_list::IgnoreSet;
use crate::notifier::{HostNotifier, Notifier, SilentNotifier};
use crate::pipeline::Pipeline;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the ignore registry
/// - unit discovery
/// - the engine with the real process executor
/// - the completion notifier
pub async fn run(args: CliArgs) -> Result<RunReport> {
    let root = args.root.clone();
    let mut raw = load_raw(&root, args.config.as_deref())?;
    apply_cli_overrides(&mut raw, &args);
    let cfg = ConfigFile::try_from(raw)?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let ignore = IgnoreSet::load(fs.as_ref(), &cfg.ignore_file_path(&root))?;
    let discovery = Discovery::new(cfg.discovery_config(&root), fs);
    let pipeline = cfg.pipeline();

    info!(
        root = %root.display(),
        strategy = %cfg.strategy(),
        stages = ?pipeline.names().collect::<Vec<_>>(),
        ignored = ignore.len(),
        "configuration resolved"
    );

    if args.dry_run {
        let units = discovery.discover().await?;
        print_dry_run(&cfg, &pipeline, &units, &ignore);
        let runnable = units.iter().filter(|u| !ignore.is_ignored(u)).count();
        return Ok(RunReport::Completed {
            units: runnable,
            stages_run: 0,
        });
    }

    let notifier: Box<dyn Notifier> = if cfg.notify_enabled() {
        Box::new(HostNotifier::detect())
    } else {
        Box::new(SilentNotifier)
    };

    let core = CoreRuntime::new(pipeline, ignore);
    let runtime = Runtime::new(core, discovery, RealExecutorBackend::new(), notifier);
    runtime.run().await
}

/// Layer CLI flags over the values read from the config file.
///
/// Overrides are applied to the raw config so they go through the same
/// validation as file values.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(strategy) = args.strategy {
        raw.discovery.strategy = strategy;
    }
    if let Some(ref manifest) = args.manifest {
        raw.discovery.manifest = manifest.clone();
    }
    if let Some(ref ignore_file) = args.ignore_file {
        raw.discovery.ignore_file = ignore_file.clone();
    }
    if !args.stages.is_empty() {
        raw.pipeline.stages = args.stages.clone();
    }
    if let Some(ref tool) = args.tool {
        raw.pipeline.tool = tool.clone();
    }
    if let Some(ref timeout) = args.timeout {
        raw.pipeline.stage_timeout = Some(timeout.clone());
    }
    if args.no_notify {
        raw.notify.enabled = false;
    }
}

/// Dry-run output: resolved settings, units (ignored ones marked) and the
/// command each stage would run.
fn print_dry_run(cfg: &ConfigFile, pipeline: &Pipeline, units: &[BuildUnit], ignore: &IgnoreSet) {
    println!("unitpipe dry-run");
    println!("  discovery.strategy = {}", cfg.strategy());
    println!("  discovery.manifest = {}", cfg.manifest());
    println!("  pipeline.tool = {}", cfg.tool());
    println!(
        "  discovery.exclude_dirs = {:?}",
        cfg.discovery_section().exclude_dirs
    );
    match cfg.stage_timeout() {
        Some(limit) => println!("  pipeline.stage_timeout = {limit:?}"),
        None => println!("  pipeline.stage_timeout = none"),
    }
    println!();

    println!("stages ({}):", pipeline.len());
    for stage in pipeline.stages() {
        println!("  - {}: {}", stage.name, stage.command_line());
    }
    println!();

    println!("units ({}):", units.len());
    for unit in units {
        if ignore.is_ignored(unit) {
            println!("  - {unit} (ignored)");
        } else {
            println!("  - {unit}");
        }
    }

    debug!("dry-run complete (no execution)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_flags_override_file_values() {
        let mut raw: RawConfigFile = toml::from_str(
            r#"
[discovery]
strategy = "tracked"
manifest = "package.json"

[pipeline]
stages = ["clean"]
"#,
        )
        .unwrap();
        let args = CliArgs::parse_from([
            "unitpipe", "--strategy", "walk", "--stage", "check", "--stage", "fmt", "--timeout",
            "5m", "--no-notify",
        ]);

        apply_cli_overrides(&mut raw, &args);
        let cfg = ConfigFile::try_from(raw).unwrap();

        assert_eq!(cfg.strategy(), crate::types::DiscoveryStrategy::Walk);
        assert_eq!(cfg.manifest(), "package.json");
        assert_eq!(
            cfg.pipeline().names().collect::<Vec<_>>(),
            vec!["check", "fmt"]
        );
        assert_eq!(cfg.stage_timeout(), Some(std::time::Duration::from_secs(300)));
        assert!(!cfg.notify_enabled());
    }

    #[test]
    fn invalid_cli_stage_fails_validation() {
        let mut raw = RawConfigFile::default();
        let args = CliArgs::parse_from(["unitpipe", "--stage", "deploy"]);
        apply_cli_overrides(&mut raw, &args);
        assert!(ConfigFile::try_from(raw).is_err());
    }
}
