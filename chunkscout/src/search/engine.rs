use crossbeam_channel::unbounded;
use std::io::BufRead;
use std::thread;
use tracing::{debug, info, warn};

use super::aggregator::{aggregate, ChannelMessage};
use super::matcher::TargetMatcher;
use super::worker::ChunkScanner;
use crate::chunk::ChunkReader;
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::results::MatchReport;

/// Runs the full chunk-and-aggregate pipeline over a line source.
///
/// The target set is compiled before the first read, so a malformed target
/// aborts the run up front. The aggregator thread starts first and waits on
/// the result channel; chunks are then submitted to a bounded worker pool
/// as they are read, so in-flight memory stays proportional to pool size
/// times chunk size. The shutdown message is enqueued only after the worker
/// pool has drained, and the aggregator is joined before this returns, on
/// success and failure paths alike, so it is never left blocked and the
/// source is always released.
pub fn scan<R: BufRead + Send>(source: R, config: &ScanConfig) -> ScanResult<MatchReport> {
    info!("starting scan with {} targets", config.targets.len());

    if config.targets.is_empty() {
        debug!("no targets provided, returning empty report");
        return Ok(MatchReport::new());
    }

    let scanner = ChunkScanner::new(TargetMatcher::new(&config.targets)?);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_count.get())
        .build()?;
    let (sender, receiver) = unbounded();

    let scanner = &scanner;
    thread::scope(|scope| {
        let aggregator = scope.spawn(move || aggregate(receiver));

        // Scope exit is the distributor's join: it returns only once every
        // submitted chunk has been processed, even when reading failed early.
        let submitted = pool.scope(|workers| -> ScanResult<u64> {
            let mut chunks: u64 = 0;
            for chunk in ChunkReader::new(source, config.chunk_size) {
                let chunk = chunk.map_err(ScanError::SourceRead)?;
                chunks += 1;
                let sender = sender.clone();
                workers.spawn(move |_| {
                    if let Some(partial) = scanner.scan_chunk(&chunk) {
                        if sender.send(ChannelMessage::Data(partial)).is_err() {
                            warn!("result channel closed before partial results were delivered");
                        }
                    }
                });
            }
            Ok(chunks)
        });

        // The shutdown message goes out even when the read loop failed,
        // otherwise the aggregator would block forever.
        let _ = sender.send(ChannelMessage::Done);
        drop(sender);

        let report = aggregator
            .join()
            .map_err(|_| ScanError::interrupted("aggregator thread panicked"))?;
        let chunks = submitted?;

        scanner.metrics().log_stats();
        info!(
            "scan complete: {} chunks, {} matches across {} targets",
            chunks,
            report.total_matches(),
            report.targets_matched()
        );
        Ok(report)
    })
}
