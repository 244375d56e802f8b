// src/exec/stage_runner.rs

//! Single stage process runner.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::engine::{StageJob, StageOutcome};

/// Run one stage command in its unit directory and wait for it.
///
/// Stdout and stderr are inherited, so the tool's own output goes straight
/// to the terminal. A command that cannot be spawned is reported as
/// [`StageOutcome::LaunchFailed`]; one that outlives its timeout is killed
/// and reported as [`StageOutcome::TimedOut`].
pub async fn run_stage(job: &StageJob) -> StageOutcome {
    match run_stage_inner(job).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                unit = %job.unit,
                stage = %job.stage.name,
                error = %format!("{err:#}"),
                "stage execution error"
            );
            StageOutcome::LaunchFailed(format!("{err:#}"))
        }
    }
}

async fn run_stage_inner(job: &StageJob) -> Result<StageOutcome> {
    let stage = &job.stage;
    info!(
        unit = %job.unit,
        stage = %stage.name,
        cmd = %stage.command_line(),
        "starting stage process"
    );

    let mut cmd = Command::new(&stage.program);
    cmd.args(&stage.args)
        .current_dir(job.unit.dir())
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().with_context(|| {
        format!(
            "spawning `{}` for stage '{}' in {}",
            stage.program,
            stage.name,
            job.unit.dir().display()
        )
    })?;

    let status = match stage.timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => waited,
            Err(_elapsed) => {
                warn!(
                    unit = %job.unit,
                    stage = %stage.name,
                    timeout = ?limit,
                    "stage timed out; killing process"
                );
                if let Err(e) = child.kill().await {
                    warn!(
                        unit = %job.unit,
                        stage = %stage.name,
                        error = %e,
                        "failed to kill timed-out stage process"
                    );
                }
                return Ok(StageOutcome::TimedOut(limit));
            }
        },
        None => child.wait().await,
    }
    .with_context(|| format!("waiting for stage '{}' in {}", stage.name, job.unit))?;

    let code = status.code().unwrap_or(-1);
    info!(
        unit = %job.unit,
        stage = %stage.name,
        exit_code = code,
        success = status.success(),
        "stage process exited"
    );

    Ok(if status.success() {
        StageOutcome::Success
    } else {
        StageOutcome::Failed(code)
    })
}
