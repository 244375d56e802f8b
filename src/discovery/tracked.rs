// src/discovery/tracked.rs

//! Tracked-file discovery: every manifest git knows about marks a unit.

use std::collections::HashSet;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::discovery::unit::BuildUnit;
use crate::errors::{Result, UnitpipeError};

/// Ask `vcs_program` (git) for all tracked files named `manifest` under
/// `root` and turn them into units, in the order git lists them.
pub async fn tracked_units(root: &Path, manifest: &str, vcs_program: &str) -> Result<Vec<BuildUnit>> {
    let pathspec = format!(":(glob)**/{manifest}");
    info!(root = %root.display(), program = vcs_program, %pathspec, "listing tracked manifests");

    let output = Command::new(vcs_program)
        .args(["ls-files", "-z", "--"])
        .arg(manifest)
        .arg(&pathspec)
        .current_dir(root)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| {
            UnitpipeError::Discovery(format!(
                "failed to run `{vcs_program} ls-files` in {}: {e}",
                root.display()
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(UnitpipeError::Discovery(format!(
            "`{vcs_program} ls-files` failed in {} ({}): {}",
            root.display(),
            output.status,
            stderr.trim()
        )));
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    Ok(parse_tracked_listing(root, manifest, &listing))
}

/// Turn a NUL- or newline-separated file listing into build units.
///
/// Only entries whose final component is exactly `manifest` count. A
/// manifest at the top of the listing yields the root unit `"."`.
/// Directories seen twice are reported once, at their first position.
pub fn parse_tracked_listing(root: &Path, manifest: &str, listing: &str) -> Vec<BuildUnit> {
    let mut seen = HashSet::new();
    let mut units = Vec::new();

    for line in listing.split(['\0', '\n']) {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        let path = Path::new(line);
        if path.file_name().and_then(|n| n.to_str()) != Some(manifest) {
            debug!(entry = line, "ignoring listing entry that is not a manifest");
            continue;
        }

        let rel_dir = path.parent().unwrap_or(Path::new(""));
        let unit = BuildUnit::new(root, rel_dir, manifest);
        if seen.insert(unit.key().to_string()) {
            units.push(unit);
        }
    }

    units
}
