//! Data models and structures for hstats

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Config;
pub use metrics::{FailureKind, HostStat, ProbeOutcome, ProbeResult};
