use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Tracks scan throughput and pattern-cache behavior
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    chunks_scanned: Arc<AtomicU64>,
    lines_scanned: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,

    // Compiled-pattern cache metrics
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self {
            chunks_scanned: Arc::new(AtomicU64::new(0)),
            lines_scanned: Arc::new(AtomicU64::new(0)),
            matches_found: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records one fully scanned chunk
    pub fn record_chunk(&self, lines: u64) {
        self.chunks_scanned.fetch_add(1, Ordering::Relaxed);
        self.lines_scanned.fetch_add(lines, Ordering::Relaxed);
    }

    /// Records occurrences found in one chunk
    pub fn record_matches(&self, count: u64) {
        self.matches_found.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a compiled-pattern cache lookup
    pub fn record_cache_operation(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Gets a snapshot of the current counters
    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            chunks_scanned: self.chunks_scanned.load(Ordering::Relaxed),
            lines_scanned: self.lines_scanned.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Chunks scanned: {}\n\
             Lines scanned: {}\n\
             Matches found: {}\n\
             Pattern cache hits/misses: {}/{}",
            stats.chunks_scanned,
            stats.lines_scanned,
            stats.matches_found,
            stats.cache_hits,
            stats.cache_misses
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of scan counters
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    pub chunks_scanned: u64,
    pub lines_scanned: u64,
    pub matches_found: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
