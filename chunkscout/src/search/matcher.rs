use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::{ScanError, ScanResult};
use crate::metrics::ScanMetrics;

static PATTERN_CACHE: Lazy<DashMap<String, Arc<Regex>>> = Lazy::new(DashMap::new);

/// The compiled target set, shared read-only across all workers.
///
/// Each target is a regex fragment, deliberately not escaped, wrapped in
/// word-boundary anchors (`\b(target)\b`). Compilation happens once here,
/// before any chunk is scanned, so a malformed target aborts the run up
/// front rather than mid-stream. Compiled patterns are cached process-wide
/// keyed by the raw target string.
#[derive(Debug, Clone)]
pub struct TargetMatcher {
    patterns: Vec<(String, Arc<Regex>)>,
    metrics: ScanMetrics,
}

impl TargetMatcher {
    /// Compiles the given target set, collapsing duplicate target strings
    pub fn new(targets: &[String]) -> ScanResult<Self> {
        Self::with_metrics(targets, ScanMetrics::new())
    }

    /// Compiles the target set, recording cache hits/misses on `metrics`
    pub fn with_metrics(targets: &[String], metrics: ScanMetrics) -> ScanResult<Self> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(targets.len());

        for target in targets {
            if !seen.insert(target.as_str()) {
                continue;
            }

            let regex = if let Some(entry) = PATTERN_CACHE.get(target.as_str()) {
                metrics.record_cache_operation(true);
                entry.clone()
            } else {
                let compiled = Regex::new(&format!(r"\b({})\b", target))
                    .map_err(|e| ScanError::invalid_target(target, e))?;
                let compiled = Arc::new(compiled);
                metrics.record_cache_operation(false);
                PATTERN_CACHE.insert(target.clone(), compiled.clone());
                compiled
            };
            patterns.push((target.clone(), regex));
        }

        Ok(Self { patterns, metrics })
    }

    /// Gets the metrics shared with this matcher
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of distinct targets
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Iterates the targets with their compiled patterns
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &Regex)> {
        self.patterns
            .iter()
            .map(|(target, regex)| (target.as_str(), regex.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_word_boundary_matching() {
        let matcher = TargetMatcher::new(&targets(&["Tim"])).unwrap();
        let (_, regex) = matcher.patterns().next().unwrap();

        assert!(regex.is_match("Tim went home"));
        assert!(regex.is_match("so did Tim"));
        assert!(regex.is_match("Tim, too"));
        // Adjacent alphanumerics suppress the match
        assert!(!regex.is_match("Timothy went home"));
        assert!(!regex.is_match("MaxTim"));
        assert!(!regex.is_match("Tim9"));
    }

    #[test]
    fn test_targets_are_regex_fragments() {
        let matcher = TargetMatcher::new(&targets(&[r"Jer+y"])).unwrap();
        let (_, regex) = matcher.patterns().next().unwrap();

        assert!(regex.is_match("Jerry ran"));
        assert!(regex.is_match("Jery ran"));
        assert!(!regex.is_match("Jey ran"));
    }

    #[test]
    fn test_duplicate_targets_collapse() {
        let matcher = TargetMatcher::new(&targets(&["Tom", "Jerry", "Tom"])).unwrap();
        assert_eq!(matcher.len(), 2);
    }

    #[test]
    fn test_invalid_target_fails_fast() {
        let err = TargetMatcher::new(&targets(&["Tom", "(unclosed"])).unwrap_err();
        match err {
            ScanError::InvalidTarget { target, .. } => assert_eq!(target, "(unclosed"),
            other => panic!("expected InvalidTarget, got {:?}", other),
        }
    }

    #[test]
    fn test_pattern_caching() {
        // Unique target so other tests cannot interfere with the counters
        let unique = format!(
            "cache_probe_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );

        let metrics = ScanMetrics::new();
        let _first = TargetMatcher::with_metrics(&[unique.clone()], metrics.clone()).unwrap();
        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.cache_misses(), 1);

        let _second = TargetMatcher::with_metrics(&[unique], metrics.clone()).unwrap();
        assert_eq!(metrics.cache_hits(), 1);
        assert_eq!(metrics.cache_misses(), 1);
    }

    #[test]
    fn test_empty_target_set() {
        let matcher = TargetMatcher::new(&[]).unwrap();
        assert!(matcher.is_empty());
    }
}
