pub mod aggregator;
pub mod engine;
pub mod matcher;
pub mod worker;

pub use aggregator::ChannelMessage;
pub use engine::scan;
pub use matcher::TargetMatcher;
pub use worker::ChunkScanner;
