// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`stage_runner`] runs one stage command in a unit directory with
//!   `tokio::process::Command`, honouring the stage timeout.
//! - [`backend`] provides the `ExecutorBackend` trait the engine talks to
//!   and the production `RealExecutorBackend`; tests swap in fakes.

pub mod backend;
pub mod stage_runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use stage_runner::run_stage;
