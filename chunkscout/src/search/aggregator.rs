use crossbeam_channel::Receiver;
use tracing::debug;

use crate::results::{MatchReport, PartialMatches};

/// Message carried on the result channel from workers to the aggregator.
///
/// A tagged union rather than a sentinel key, so no legitimate target string
/// can collide with the shutdown signal.
#[derive(Debug)]
pub enum ChannelMessage {
    Data(PartialMatches),
    Done,
}

/// Single-consumer merge loop.
///
/// Blocks on the channel until `Done` arrives, folding every partial into
/// the report by set union. The orchestrator enqueues `Done` only after all
/// workers have finished, so it is always the last message consumed. A
/// disconnected channel is treated like `Done`, so a failing producer side
/// can never leave this thread blocked.
pub(crate) fn aggregate(results: Receiver<ChannelMessage>) -> MatchReport {
    let mut report = MatchReport::new();
    let mut partials: u64 = 0;

    loop {
        match results.recv() {
            Ok(ChannelMessage::Data(partial)) => {
                partials += 1;
                report.merge(partial);
            }
            Ok(ChannelMessage::Done) => break,
            Err(_) => {
                debug!("result channel disconnected before the shutdown message");
                break;
            }
        }
    }

    debug!(
        "aggregated {} partial mappings across {} targets",
        partials,
        report.targets_matched()
    );
    report
}
