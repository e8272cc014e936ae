//! Type definitions and aliases

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Summary-line dialect printed by the system ping utility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFormat {
    /// Linux iputils: `rtt min/avg/max/mdev = 0.016/0.020/0.025/0.005 ms`
    #[value(name = "iputils")]
    IpUtils,
    /// BSD and macOS: `round-trip min/avg/max/stddev = 6.841/7.521/8.084/0.514 ms`
    Bsd,
    /// Windows: `Minimum = 40ms, Maximum = 42ms, Average = 41ms`
    Windows,
}

impl PlatformFormat {
    /// Format used by the ping shipped with the compile target
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly",
        )) {
            Self::Bsd
        } else {
            Self::IpUtils
        }
    }

    /// Flag that sets the number of echo requests
    pub fn count_flag(&self) -> &'static str {
        match self {
            Self::Windows => "-n",
            Self::IpUtils | Self::Bsd => "-c",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IpUtils => "iputils",
            Self::Bsd => "bsd",
            Self::Windows => "windows",
        }
    }
}

impl Default for PlatformFormat {
    fn default() -> Self {
        Self::detect()
    }
}

impl fmt::Display for PlatformFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "iputils" | "linux" => Ok(Self::IpUtils),
            "bsd" | "macos" | "darwin" => Ok(Self::Bsd),
            "windows" | "win" => Ok(Self::Windows),
            other => Err(AppError::config(format!(
                "Unknown platform format '{}' (expected iputils, bsd or windows)",
                other
            ))),
        }
    }
}

/// Report rendering selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Right-aligned text table
    #[default]
    Table,
    /// JSON array, one object per host
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_flag_per_platform() {
        assert_eq!(PlatformFormat::IpUtils.count_flag(), "-c");
        assert_eq!(PlatformFormat::Bsd.count_flag(), "-c");
        assert_eq!(PlatformFormat::Windows.count_flag(), "-n");
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("iputils".parse::<PlatformFormat>().unwrap(), PlatformFormat::IpUtils);
        assert_eq!("BSD".parse::<PlatformFormat>().unwrap(), PlatformFormat::Bsd);
        assert_eq!(" windows ".parse::<PlatformFormat>().unwrap(), PlatformFormat::Windows);
        assert!("solaris".parse::<PlatformFormat>().is_err());
    }

    #[test]
    fn test_platform_display_round_trips() {
        for format in [PlatformFormat::IpUtils, PlatformFormat::Bsd, PlatformFormat::Windows] {
            assert_eq!(format.to_string().parse::<PlatformFormat>().unwrap(), format);
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detect_on_linux() {
        assert_eq!(PlatformFormat::detect(), PlatformFormat::IpUtils);
    }
}
