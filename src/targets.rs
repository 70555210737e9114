//! Target list acquisition.
//!
//! Targets come either from the single positional CLI argument or from a
//! line-delimited file. An absent or empty source is a fatal, pre-job
//! condition: no jobs run and nothing is written.

use crate::error::CaptureError;
use crate::job::Target;
use std::path::Path;
use tokio::fs;

pub const TARGETS_FILENAME: &str = "targets.txt";

/// Resolve the ordered target list for this run.
pub async fn load_targets(
    cli_url: Option<String>,
    targets_path: &Path,
) -> Result<Vec<Target>, CaptureError> {
    if let Some(url) = cli_url {
        return Ok(vec![Target::new(&url)?]);
    }

    let content = fs::read_to_string(targets_path).await.map_err(|_| {
        CaptureError::Config(format!(
            "no target URL given and {} is not readable",
            targets_path.display()
        ))
    })?;

    parse_target_list(&content)
}

/// Parse a line-delimited target list: one URL per line, surrounding
/// whitespace trimmed, blank lines ignored, order preserved.
pub fn parse_target_list(content: &str) -> Result<Vec<Target>, CaptureError> {
    let targets: Vec<Target> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Target::new)
        .collect::<Result<_, _>>()?;

    if targets.is_empty() {
        return Err(CaptureError::Config("target list is empty".to_string()));
    }

    Ok(targets)
}
