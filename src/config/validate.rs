// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, DiscoverySection, PipelineSection, RawConfigFile};
use crate::discovery::ExclusionSet;
use crate::errors::{Result, UnitpipeError};
use crate::pipeline::BuiltinStage;
use crate::types::parse_duration;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = UnitpipeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_discovery(&raw.discovery)?;
        let exclusions = ExclusionSet::new(&raw.discovery.exclude_dirs)
            .map_err(|e| UnitpipeError::ConfigError(format!("[discovery].exclude_dirs: {e:#}")))?;
        let stages = validate_stages(&raw.pipeline)?;
        let stage_timeout = validate_timeout(&raw.pipeline)?;

        if raw.pipeline.tool.trim().is_empty() {
            return Err(UnitpipeError::ConfigError(
                "[pipeline].tool must not be empty".to_string(),
            ));
        }

        Ok(ConfigFile::new_unchecked(
            raw.discovery,
            exclusions,
            raw.pipeline.tool,
            stages,
            stage_timeout,
            raw.notify.enabled,
        ))
    }
}

fn validate_discovery(section: &DiscoverySection) -> Result<()> {
    let manifest = section.manifest.trim();
    if manifest.is_empty() {
        return Err(UnitpipeError::ConfigError(
            "[discovery].manifest must not be empty".to_string(),
        ));
    }
    if manifest != section.manifest {
        return Err(UnitpipeError::ConfigError(format!(
            "[discovery].manifest must not have surrounding whitespace (got '{}')",
            section.manifest
        )));
    }
    if manifest.contains(['/', '\\']) || manifest == "." || manifest == ".." {
        return Err(UnitpipeError::ConfigError(format!(
            "[discovery].manifest must be a bare file name (got '{}')",
            section.manifest
        )));
    }
    if section.ignore_file.trim().is_empty() {
        return Err(UnitpipeError::ConfigError(
            "[discovery].ignore_file must not be empty".to_string(),
        ));
    }
    if section.vcs_program.trim().is_empty() {
        return Err(UnitpipeError::ConfigError(
            "[discovery].vcs_program must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_stages(section: &PipelineSection) -> Result<Vec<BuiltinStage>> {
    if section.stages.is_empty() {
        return Err(UnitpipeError::ConfigError(
            "[pipeline].stages must name at least one stage".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut stages = Vec::with_capacity(section.stages.len());
    for name in &section.stages {
        let stage: BuiltinStage = name
            .parse()
            .map_err(|e: String| UnitpipeError::ConfigError(format!("[pipeline].stages: {e}")))?;
        if !seen.insert(stage) {
            return Err(UnitpipeError::ConfigError(format!(
                "[pipeline].stages lists '{}' more than once",
                stage
            )));
        }
        stages.push(stage);
    }
    Ok(stages)
}

fn validate_timeout(section: &PipelineSection) -> Result<Option<std::time::Duration>> {
    let Some(raw) = section.stage_timeout.as_deref() else {
        return Ok(None);
    };

    let timeout = parse_duration(raw)
        .map_err(|e| UnitpipeError::ConfigError(format!("[pipeline].stage_timeout: {e}")))?;
    if timeout.is_zero() {
        return Err(UnitpipeError::ConfigError(
            "[pipeline].stage_timeout must be greater than zero".to_string(),
        ));
    }
    Ok(Some(timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config_error(raw: RawConfigFile) -> String {
        match ConfigFile::try_from(raw) {
            Err(UnitpipeError::ConfigError(msg)) => msg,
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn defaults_validate() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert_eq!(cfg.stages(), &BuiltinStage::ALL);
        assert_eq!(cfg.tool(), "cargo");
        assert_eq!(cfg.manifest(), "Cargo.toml");
        assert!(cfg.stage_timeout().is_none());
        assert!(cfg.notify_enabled());
    }

    #[test]
    fn rejects_unknown_and_duplicate_stages() {
        let mut raw = RawConfigFile::default();
        raw.pipeline.stages = vec!["check".into(), "lint".into()];
        assert!(config_error(raw).contains("lint"));

        let mut raw = RawConfigFile::default();
        raw.pipeline.stages = vec!["check".into(), "CHECK".into()];
        assert!(config_error(raw).contains("more than once"));

        let mut raw = RawConfigFile::default();
        raw.pipeline.stages.clear();
        assert!(config_error(raw).contains("at least one"));
    }

    #[test]
    fn rejects_manifest_paths() {
        let mut raw = RawConfigFile::default();
        raw.discovery.manifest = "sub/Cargo.toml".into();
        assert!(config_error(raw).contains("bare file name"));

        let mut raw = RawConfigFile::default();
        raw.discovery.manifest = " Cargo.toml".into();
        assert!(config_error(raw).contains("whitespace"));
    }

    #[test]
    fn timeout_must_parse_and_be_positive() {
        let mut raw = RawConfigFile::default();
        raw.pipeline.stage_timeout = Some("0s".into());
        assert!(config_error(raw).contains("greater than zero"));

        let mut raw = RawConfigFile::default();
        raw.pipeline.stage_timeout = Some("soon".into());
        assert!(config_error(raw).contains("stage_timeout"));

        let mut raw = RawConfigFile::default();
        raw.pipeline.stage_timeout = Some("90s".into());
        let cfg = ConfigFile::try_from(raw).unwrap();
        assert_eq!(cfg.stage_timeout(), Some(Duration::from_secs(90)));
        assert!(cfg.pipeline().stages().iter().all(|s| s.timeout == Some(Duration::from_secs(90))));
    }

    #[test]
    fn rejects_bad_exclusion_glob() {
        let mut raw = RawConfigFile::default();
        raw.discovery.exclude_dirs = vec!["[oops".into()];
        assert!(config_error(raw).contains("exclude_dirs"));
    }

    #[test]
    fn rejects_empty_tool() {
        let mut raw = RawConfigFile::default();
        raw.pipeline.tool = "  ".into();
        assert!(config_error(raw).contains("tool"));
    }
}
