// src/notifier.rs

//! Completion signal.
//!
//! On hosts where an audible cue is available (macOS, WSL) a short sound is
//! played when the run completes or aborts. Anything that goes wrong here
//! is logged at debug level and swallowed: the notifier never changes the
//! run's outcome or exit status.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::engine::RunReport;

pub trait Notifier: Send + Sync {
    fn notify<'a>(&'a self, report: &'a RunReport) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Host environments with a known way to make a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEnvironment {
    MacOs,
    Wsl,
    Other,
}

impl HostEnvironment {
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            HostEnvironment::MacOs
        } else if std::env::var_os("WSL_DISTRO_NAME").is_some()
            || std::env::var_os("WSL_INTEROP").is_some()
        {
            HostEnvironment::Wsl
        } else {
            HostEnvironment::Other
        }
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

/// The command that plays the completion cue on `host`, if there is one.
pub fn signal_command(host: HostEnvironment, success: bool) -> Option<SignalCommand> {
    match host {
        HostEnvironment::MacOs => {
            let sound = if success { "Glass" } else { "Basso" };
            Some(SignalCommand {
                program: "afplay",
                args: vec![format!("/System/Library/Sounds/{sound}.aiff")],
            })
        }
        HostEnvironment::Wsl => {
            let (freq, millis) = if success { (880, 200) } else { (220, 600) };
            Some(SignalCommand {
                program: "powershell.exe",
                args: vec![
                    "-NoProfile".to_string(),
                    "-Command".to_string(),
                    format!("[console]::beep({freq},{millis})"),
                ],
            })
        }
        HostEnvironment::Other => None,
    }
}

/// Plays the host's completion cue.
#[derive(Debug, Clone, Copy)]
pub struct HostNotifier {
    host: HostEnvironment,
}

impl HostNotifier {
    pub fn detect() -> Self {
        Self::for_host(HostEnvironment::detect())
    }

    pub fn for_host(host: HostEnvironment) -> Self {
        Self { host }
    }

    pub fn host(&self) -> HostEnvironment {
        self.host
    }
}

impl Notifier for HostNotifier {
    fn notify<'a>(&'a self, report: &'a RunReport) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let Some(signal) = signal_command(self.host, report.is_success()) else {
                debug!(host = ?self.host, "no completion signal for this host");
                return;
            };

            let status = Command::new(signal.program)
                .args(&signal.args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;

            match status {
                Ok(s) if s.success() => {}
                Ok(s) => debug!(program = signal.program, status = %s, "completion signal exited unsuccessfully"),
                Err(e) => debug!(program = signal.program, error = %e, "could not emit completion signal"),
            }
        })
    }
}

/// Does nothing; used with `--no-notify` and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify<'a>(&'a self, _report: &'a RunReport) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async {})
    }
}
