use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Default number of lines per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Configuration for a scan run.
///
/// Can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config`
/// 2. Local `.chunkscout.yaml` in the current directory
/// 3. Global `$HOME/.config/chunkscout/config.yaml`
///
/// YAML format, for example:
/// ```yaml
/// # Target strings to search for (regex fragments, word-boundary anchored)
/// targets:
///   - "Timothy"
///   - "Jer+y"
///
/// # Lines per chunk
/// chunk_size: 1000
///
/// # Worker thread count (default: CPU cores - 1, floor 1)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// CLI arguments take precedence over config file values; the merging
/// behavior is defined in `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Target strings to search for. Duplicates collapse; each target is a
    /// regex fragment matched with word-boundary anchors on both sides.
    #[serde(default)]
    pub targets: Vec<String>,

    /// Number of lines per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Number of worker threads. One unit of parallelism is reserved for the
    /// aggregator, so the default is CPU cores minus one, floor one.
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get().saturating_sub(1).max(1)).unwrap()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            chunk_size: default_chunk_size(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        // Default config locations
        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("chunkscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".chunkscout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        // Add existing config files
        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // Build and deserialize
        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli_config: ScanConfig) -> Self {
        // CLI values take precedence over config file values
        if !cli_config.targets.is_empty() {
            self.targets = cli_config.targets;
        }
        if cli_config.chunk_size != default_chunk_size() {
            self.chunk_size = cli_config.chunk_size;
        }
        // Always use CLI thread count if specified
        self.thread_count = cli_config.thread_count;
        if cli_config.log_level != default_log_level() {
            self.log_level = cli_config.log_level;
        }
        self
    }
}
