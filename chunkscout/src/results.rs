use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// A single occurrence of a target within the input.
///
/// `line_offset` is the base line offset of the chunk the match was found in,
/// not the absolute input line number. `char_offset` counts characters from
/// the start of the chunk's lines concatenated without separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLocation {
    pub line_offset: u64,
    pub char_offset: u64,
}

impl fmt::Display for MatchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[lineOffset={}, charOffset={}]",
            self.line_offset, self.char_offset
        )
    }
}

/// One worker's match results for one chunk.
///
/// Only targets with at least one match are present.
#[derive(Debug, Clone, Default)]
pub struct PartialMatches {
    by_target: HashMap<String, Vec<MatchLocation>>,
}

impl PartialMatches {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a single occurrence to the target's location list
    pub fn record(&mut self, target: &str, location: MatchLocation) {
        match self.by_target.get_mut(target) {
            Some(locations) => locations.push(location),
            None => {
                self.by_target.insert(target.to_string(), vec![location]);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    /// Number of targets with at least one match
    pub fn targets_matched(&self) -> usize {
        self.by_target.len()
    }

    /// Total number of recorded occurrences
    pub fn total_locations(&self) -> usize {
        self.by_target.values().map(Vec::len).sum()
    }

    pub fn into_pairs(self) -> impl Iterator<Item = (String, Vec<MatchLocation>)> {
        self.by_target.into_iter()
    }
}

/// The globally merged match results for all targets.
///
/// Backed by ordered collections so target iteration and each target's
/// location set are deterministic: targets lexicographically, locations by
/// `(line_offset, char_offset)` with duplicates collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MatchReport {
    by_target: BTreeMap<String, BTreeSet<MatchLocation>>,
}

impl MatchReport {
    pub fn new() -> Self {
        Default::default()
    }

    /// Merges one chunk's partial results by set union. Grows monotonically;
    /// arrival order of partials does not affect the merged state.
    pub fn merge(&mut self, partial: PartialMatches) {
        for (target, locations) in partial.into_pairs() {
            self.by_target.entry(target).or_default().extend(locations);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }

    /// Number of targets with at least one match
    pub fn targets_matched(&self) -> usize {
        self.by_target.len()
    }

    /// Total number of distinct match locations across all targets
    pub fn total_matches(&self) -> usize {
        self.by_target.values().map(BTreeSet::len).sum()
    }

    pub fn locations(&self, target: &str) -> Option<&BTreeSet<MatchLocation>> {
        self.by_target.get(target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<MatchLocation>)> {
        self.by_target
            .iter()
            .map(|(target, locations)| (target.as_str(), locations))
    }

    /// Renders the report in its canonical text form, one line per matched
    /// target: `target --> [[lineOffset=L, charOffset=C],...]`. An empty
    /// report renders as the empty string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (target, locations) in &self.by_target {
            out.push_str(target);
            out.push_str(" --> [");
            for (i, location) in locations.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&location.to_string());
            }
            out.push_str("]\n");
        }
        out
    }
}
