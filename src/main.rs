// src/main.rs

use std::process::ExitCode;

use unitpipe::engine::{RunReport, EXIT_ERROR};
use unitpipe::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run_main().await {
        Ok(report) => ExitCode::from(report.exit_code()),
        Err(err) => {
            eprintln!("unitpipe error: {err:?}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn run_main() -> anyhow::Result<RunReport> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
