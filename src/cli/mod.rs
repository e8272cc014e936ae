//! Command-line interface

use crate::types::{OutputFormat, PlatformFormat};
use clap::Parser;

/// hstats - rank hosts by round-trip latency using the system ping
#[derive(Parser, Debug, Clone)]
#[command(name = "hstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input file containing whitespace-separated hosts ("-" reads stdin) [default: -]
    #[arg(short, long)]
    pub infile: Option<String>,

    /// Number of probes run in parallel
    #[arg(short, long, visible_alias = "gonum")]
    pub concurrency: Option<usize>,

    /// Number of echo requests sent to each host
    #[arg(short = 'n', long)]
    pub count: Option<u32>,

    /// Per-host probe timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Latency in milliseconds reported for hosts whose probe failed
    #[arg(long, value_name = "MS")]
    pub sentinel: Option<f64>,

    /// Probe program name or path
    #[arg(long, value_name = "PROGRAM")]
    pub ping: Option<String>,

    /// Output dialect of the probe program (detected from the OS by default)
    #[arg(long, value_enum)]
    pub platform: Option<PlatformFormat>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.concurrency == Some(0) {
            return Err("--concurrency must be at least 1".to_string());
        }

        if self.count == Some(0) {
            return Err("--count must be at least 1".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Colors are only used on an interactive terminal that allows them
fn supports_color() -> bool {
    use std::io::IsTerminal;

    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    std::io::stdout().is_terminal()
}
