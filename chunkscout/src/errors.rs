use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while running the scan pipeline
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Source read error: {0}")]
    SourceRead(#[source] io::Error),
    #[error("Invalid target pattern '{target}': {source}")]
    InvalidTarget {
        target: String,
        source: regex::Error,
    },
    #[error("Sink write error: {0}")]
    SinkWrite(#[source] io::Error),
    #[error("Failed to read target file {}: {source}", path.display())]
    TargetFile { path: PathBuf, source: io::Error },
    #[error("Interrupted: {0}")]
    Interrupted(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    pub fn invalid_target(target: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            source,
        }
    }

    pub fn target_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::TargetFile {
            path: path.into(),
            source,
        }
    }

    pub fn interrupted(msg: impl Into<String>) -> Self {
        Self::Interrupted(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
