// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! A failing *stage* is not an error: it is reported through
//! [`RunReport::Aborted`](crate::engine::RunReport). Errors here are the
//! conditions that stop the tool before or outside of the pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnitpipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Discovery error: {0}")]
    Discovery(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, UnitpipeError>;
