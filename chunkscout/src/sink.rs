use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};

/// Destination for the final rendered report. Receives the complete report
/// exactly once, after aggregation has finished; a failing sink does not
/// invalidate the computed results.
pub trait ReportSink {
    fn write_report(&mut self, report: &str) -> ScanResult<()>;
}

/// Echoes the report to stdout
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn write_report(&mut self, report: &str) -> ScanResult<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(report.as_bytes())
            .and_then(|_| handle.flush())
            .map_err(ScanError::SinkWrite)
    }
}

/// Persists the report to a file, creating or truncating it
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for FileSink {
    fn write_report(&mut self, report: &str) -> ScanResult<()> {
        fs::write(&self.path, report).map_err(ScanError::SinkWrite)?;
        debug!("report written to {}", self.path.display());
        Ok(())
    }
}

/// Forwards one report to several sinks. Every sink is attempted even when
/// an earlier one fails; the first failure is returned.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ReportSink for FanoutSink {
    fn write_report(&mut self, report: &str) -> ScanResult<()> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.write_report(report) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
