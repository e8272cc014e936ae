//! Configuration data model and validation

use crate::types::{AppError, OutputFormat, PlatformFormat, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Host list source; `-` reads standard input
    #[serde(default = "default_infile")]
    pub infile: String,

    /// Maximum number of probes in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Echo requests sent to each host
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,

    /// Wall-clock limit for one probe invocation
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Latency recorded for hosts whose probe failed
    #[serde(default = "default_sentinel_ms")]
    pub sentinel_ms: f64,

    /// Probe executable name or path
    #[serde(default = "default_probe_program")]
    pub probe_program: String,

    /// Output dialect override; detected from the target when unset
    #[serde(default)]
    pub platform: Option<PlatformFormat>,

    #[serde(default)]
    pub output_format: OutputFormat,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            infile: default_infile(),
            concurrency: default_concurrency(),
            probe_count: default_probe_count(),
            timeout_seconds: default_timeout_secs(),
            sentinel_ms: default_sentinel_ms(),
            probe_program: default_probe_program(),
            platform: None,
            output_format: OutputFormat::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Platform format in effect, falling back to the compile target
    pub fn platform_format(&self) -> PlatformFormat {
        self.platform.unwrap_or_else(PlatformFormat::detect)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(AppError::config("Concurrency must be greater than 0"));
        }

        if self.concurrency > crate::defaults::MAX_CONCURRENCY {
            return Err(AppError::config(format!(
                "Concurrency cannot exceed {}",
                crate::defaults::MAX_CONCURRENCY
            )));
        }

        if self.probe_count == 0 {
            return Err(AppError::config("Probe count must be greater than 0"));
        }

        if self.probe_count > 100 {
            return Err(AppError::config("Probe count cannot exceed 100"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 600 {
            return Err(AppError::config("Timeout cannot exceed 600 seconds"));
        }

        if !self.sentinel_ms.is_finite() || self.sentinel_ms <= 0.0 {
            return Err(AppError::config(format!(
                "Sentinel latency must be a positive number of milliseconds, got {}",
                self.sentinel_ms
            )));
        }

        if self.probe_program.trim().is_empty() {
            return Err(AppError::config("Probe program cannot be empty"));
        }

        Ok(())
    }

    /// Merge HSTATS_* environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(infile) = std::env::var("HSTATS_INFILE") {
            self.infile = infile.trim().to_string();
        }

        if let Ok(concurrency) = std::env::var("HSTATS_CONCURRENCY") {
            self.concurrency = concurrency.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid HSTATS_CONCURRENCY value '{}': {}", concurrency, e)))?;
        }

        if let Ok(count) = std::env::var("HSTATS_COUNT") {
            self.probe_count = count.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid HSTATS_COUNT value '{}': {}", count, e)))?;
        }

        if let Ok(timeout) = std::env::var("HSTATS_TIMEOUT") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid HSTATS_TIMEOUT value '{}': {}", timeout, e)))?;
        }

        if let Ok(sentinel) = std::env::var("HSTATS_SENTINEL_MS") {
            self.sentinel_ms = sentinel.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid HSTATS_SENTINEL_MS value '{}': {}", sentinel, e)))?;
        }

        if let Ok(program) = std::env::var("HSTATS_PING") {
            self.probe_program = program.trim().to_string();
        }

        if let Ok(platform) = std::env::var("HSTATS_PLATFORM") {
            self.platform = Some(platform.parse()?);
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_infile() -> String {
    crate::defaults::STDIN_MARKER.to_string()
}

fn default_concurrency() -> usize {
    crate::defaults::DEFAULT_CONCURRENCY
}

fn default_probe_count() -> u32 {
    crate::defaults::DEFAULT_PROBE_COUNT
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_sentinel_ms() -> f64 {
    crate::defaults::SENTINEL_MS
}

fn default_probe_program() -> String {
    crate::defaults::DEFAULT_PROBE_PROGRAM.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
