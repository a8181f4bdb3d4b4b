use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};

/// Loads the target set from a file: one target per line, trimmed, empty
/// lines dropped, duplicates collapsed keeping first-seen order. The set is
/// loaded once before the pipeline starts and is immutable thereafter.
pub fn load_targets(path: &Path) -> ScanResult<Vec<String>> {
    let contents = fs::read_to_string(path).map_err(|e| ScanError::target_file(path, e))?;

    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for line in contents.lines() {
        let target = line.trim();
        if target.is_empty() || !seen.insert(target.to_string()) {
            continue;
        }
        targets.push(target.to_string());
    }

    debug!("loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}
