pub mod chunk;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod search;
pub mod sink;
pub mod targets;

pub use chunk::{Chunk, ChunkReader};
pub use config::ScanConfig;
pub use errors::{ScanError, ScanResult};
pub use results::{MatchLocation, MatchReport, PartialMatches};
pub use search::scan;
