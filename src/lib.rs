//! hstats
//!
//! Measures round-trip latency to a list of hosts by running the system
//! ping utility concurrently, parses each summary line into min/avg/max
//! statistics and ranks the hosts from fastest to slowest.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use executor::{DispatchEngine, DispatchReport, ExecutionConfig};
pub use models::{Config, HostStat, ProbeResult};
pub use probe::{Pinger, ProbeRunner};
pub use types::PlatformFormat;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata stamped by build.rs
pub mod build_info {
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
    pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const STDIN_MARKER: &str = "-";
    pub const DEFAULT_CONCURRENCY: usize = 16;
    pub const MAX_CONCURRENCY: usize = 1024;
    pub const DEFAULT_PROBE_COUNT: u32 = 4;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_PROBE_PROGRAM: &str = "ping";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Latency assigned to hosts whose probe failed. Tunable through
    /// `--sentinel` / `HSTATS_SENTINEL_MS`.
    pub const SENTINEL_MS: f64 = 10000.0;
}
