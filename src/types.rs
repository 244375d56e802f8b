use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// How build units are found.
///
/// - `Tracked`: ask git for every tracked manifest file and use the
///   containing directories, in git's listing order.
/// - `Walk`: walk the filesystem depth-first from the root (parent before
///   child), skipping excluded directory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryStrategy {
    Tracked,
    Walk,
}

impl Default for DiscoveryStrategy {
    fn default() -> Self {
        DiscoveryStrategy::Walk
    }
}

impl FromStr for DiscoveryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tracked" | "git" => Ok(DiscoveryStrategy::Tracked),
            "walk" | "fs" => Ok(DiscoveryStrategy::Walk),
            other => Err(format!(
                "invalid discovery strategy: {other} (expected \"tracked\" or \"walk\")"
            )),
        }
    }
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryStrategy::Tracked => f.write_str("tracked"),
            DiscoveryStrategy::Walk => f.write_str("walk"),
        }
    }
}

/// Parse a duration string such as `"500ms"`, `"30s"`, `"10m"` or `"1h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| format!("duration '{s}' is missing a unit suffix"))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => secs_scaled(value, 60, s),
        "h" => secs_scaled(value, 60 * 60, s),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}

fn secs_scaled(value: u64, factor: u64, raw: &str) -> Result<Duration, String> {
    value
        .checked_mul(factor)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{raw}' is out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_aliases() {
        assert_eq!("tracked".parse(), Ok(DiscoveryStrategy::Tracked));
        assert_eq!("GIT".parse(), Ok(DiscoveryStrategy::Tracked));
        assert_eq!(" walk ".parse(), Ok(DiscoveryStrategy::Walk));
        assert!("bfs".parse::<DiscoveryStrategy>().is_err());
    }

    #[test]
    fn durations() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert!(parse_duration("30").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("3d").is_err());
        assert!(parse_duration("18446744073709551h").unwrap_err().contains("out of range"));
        assert!(parse_duration("307445734561825861m").is_err());
    }
}
