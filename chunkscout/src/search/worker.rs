use tracing::trace;

use super::matcher::TargetMatcher;
use crate::chunk::Chunk;
use crate::metrics::ScanMetrics;
use crate::results::{MatchLocation, PartialMatches};

/// Scans single chunks against the full target set.
///
/// One instance is shared by reference across all worker threads; it holds
/// no per-chunk state.
#[derive(Debug, Clone)]
pub struct ChunkScanner {
    matcher: TargetMatcher,
}

impl ChunkScanner {
    pub fn new(matcher: TargetMatcher) -> Self {
        Self { matcher }
    }

    pub fn metrics(&self) -> &ScanMetrics {
        self.matcher.metrics()
    }

    /// Finds every word-boundary occurrence of every target in the chunk.
    ///
    /// Every location carries the chunk's `base_line_offset`; `char_offset`
    /// is the match's character position within the chunk's lines
    /// concatenated without separators, so each line's character count
    /// accumulates before the next line starts. Returns `None` when nothing
    /// matched, so empty partials never reach the result channel.
    pub fn scan_chunk(&self, chunk: &Chunk) -> Option<PartialMatches> {
        let mut partial = PartialMatches::new();
        let mut line_first_char: u64 = 0;

        for line in &chunk.lines {
            for (target, regex) in self.matcher.patterns() {
                for m in regex.find_iter(line) {
                    let char_start = line[..m.start()].chars().count() as u64;
                    partial.record(
                        target,
                        MatchLocation {
                            line_offset: chunk.base_line_offset,
                            char_offset: line_first_char + char_start,
                        },
                    );
                }
            }
            line_first_char += line.chars().count() as u64;
        }

        self.metrics().record_chunk(chunk.len() as u64);

        if partial.is_empty() {
            None
        } else {
            trace!(
                "chunk at base {} matched {} targets",
                chunk.base_line_offset,
                partial.targets_matched()
            );
            self.metrics().record_matches(partial.total_locations() as u64);
            Some(partial)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(targets: &[&str]) -> ChunkScanner {
        let targets: Vec<String> = targets.iter().map(|s| s.to_string()).collect();
        ChunkScanner::new(TargetMatcher::new(&targets).unwrap())
    }

    fn chunk(base_line_offset: u64, lines: &[&str]) -> Chunk {
        Chunk {
            base_line_offset,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn locations(partial: &Option<PartialMatches>, target: &str) -> Vec<(u64, u64)> {
        partial
            .clone()
            .unwrap()
            .into_pairs()
            .find(|(t, _)| t == target)
            .map(|(_, locs)| {
                locs.iter()
                    .map(|l| (l.line_offset, l.char_offset))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_offsets_accumulate_across_lines() {
        // "Tom met Jerry" is 13 characters and lines concatenate without
        // separators, so the second line's "Jerry" starts at 13.
        let scanner = scanner(&["Jerry"]);
        let partial = scanner.scan_chunk(&chunk(0, &["Tom met Jerry", "Jerry ran"]));
        assert_eq!(locations(&partial, "Jerry"), vec![(0, 8), (0, 13)]);
    }

    #[test]
    fn test_all_locations_carry_chunk_base() {
        let scanner = scanner(&["Jerry"]);
        let partial = scanner.scan_chunk(&chunk(3000, &["Jerry", "x", "Jerry"]));
        assert_eq!(locations(&partial, "Jerry"), vec![(3000, 0), (3000, 6)]);
    }

    #[test]
    fn test_word_boundaries_respected() {
        let scanner = scanner(&["Tim"]);
        let partial = scanner.scan_chunk(&chunk(0, &["Timothy met Tim and TimTim"]));
        assert_eq!(locations(&partial, "Tim"), vec![(0, 12)]);
    }

    #[test]
    fn test_multiple_targets_in_one_chunk() {
        let scanner = scanner(&["Tom", "Jerry"]);
        let partial = scanner.scan_chunk(&chunk(0, &["Tom met Jerry"])).unwrap();
        assert_eq!(partial.targets_matched(), 2);
        assert_eq!(partial.total_locations(), 2);
    }

    #[test]
    fn test_no_match_yields_none() {
        let scanner = scanner(&["Jerry"]);
        assert!(scanner.scan_chunk(&chunk(0, &["nothing here"])).is_none());
    }

    #[test]
    fn test_char_offsets_not_byte_offsets() {
        // "héllo " is 6 characters but 7 bytes.
        let scanner = scanner(&["Tim"]);
        let partial = scanner.scan_chunk(&chunk(0, &["héllo Tim"]));
        assert_eq!(locations(&partial, "Tim"), vec![(0, 6)]);
    }

    #[test]
    fn test_metrics_recorded() {
        let scanner = scanner(&["Jerry"]);
        scanner.scan_chunk(&chunk(0, &["Jerry", "nothing"]));

        let stats = scanner.metrics().get_stats();
        assert_eq!(stats.chunks_scanned, 1);
        assert_eq!(stats.lines_scanned, 2);
        assert_eq!(stats.matches_found, 1);
    }
}
