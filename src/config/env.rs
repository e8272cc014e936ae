//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::types::PlatformFormat;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Check every supported variable that is currently set
    pub fn validate_environment() -> Result<()> {
        for (name, _) in Self::supported_variables() {
            if let Ok(value) = std::env::var(name) {
                Self::validate_env_var(name, &value)?;
            }
        }
        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "HSTATS_CONCURRENCY" => {
                let n: usize = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid HSTATS_CONCURRENCY value '{}': {}", value, e)))?;
                if n == 0 || n > crate::defaults::MAX_CONCURRENCY {
                    return Err(AppError::config(format!(
                        "HSTATS_CONCURRENCY must be between 1 and {}, got: {}",
                        crate::defaults::MAX_CONCURRENCY, n
                    )));
                }
            }
            "HSTATS_COUNT" => {
                let n: u32 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid HSTATS_COUNT value '{}': {}", value, e)))?;
                if n == 0 || n > 100 {
                    return Err(AppError::config(format!("HSTATS_COUNT must be between 1 and 100, got: {}", n)));
                }
            }
            "HSTATS_TIMEOUT" => {
                let n: u64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid HSTATS_TIMEOUT value '{}': {}", value, e)))?;
                if n == 0 || n > 600 {
                    return Err(AppError::config(format!("HSTATS_TIMEOUT must be between 1 and 600, got: {}", n)));
                }
            }
            "HSTATS_SENTINEL_MS" => {
                let n: f64 = value.parse()
                    .map_err(|e| AppError::config(format!("Invalid HSTATS_SENTINEL_MS value '{}': {}", value, e)))?;
                if !n.is_finite() || n <= 0.0 {
                    return Err(AppError::config(format!("HSTATS_SENTINEL_MS must be positive, got: {}", n)));
                }
            }
            "HSTATS_PLATFORM" => {
                value.parse::<PlatformFormat>()?;
            }
            "HSTATS_PING" | "HSTATS_INFILE" => {
                if value.is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", key)));
                }
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn supported_variables() -> Vec<(&'static str, &'static str)> {
        vec![
            ("HSTATS_INFILE", "Host list file; '-' reads standard input"),
            ("HSTATS_CONCURRENCY", "Number of probes run in parallel (default 16)"),
            ("HSTATS_COUNT", "Echo requests per host (default 4)"),
            ("HSTATS_TIMEOUT", "Per-host probe timeout in seconds (default 30)"),
            ("HSTATS_SENTINEL_MS", "Latency reported for failed hosts (default 10000)"),
            ("HSTATS_PING", "Probe program name or path (default ping)"),
            ("HSTATS_PLATFORM", "Probe output dialect: iputils, bsd or windows"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("HSTATS_CONCURRENCY", "8").is_ok());
        assert!(EnvManager::validate_env_var("HSTATS_CONCURRENCY", "0").is_err());
        assert!(EnvManager::validate_env_var("HSTATS_CONCURRENCY", "many").is_err());

        assert!(EnvManager::validate_env_var("HSTATS_COUNT", "4").is_ok());
        assert!(EnvManager::validate_env_var("HSTATS_COUNT", "101").is_err());

        assert!(EnvManager::validate_env_var("HSTATS_TIMEOUT", "30").is_ok());
        assert!(EnvManager::validate_env_var("HSTATS_TIMEOUT", "0").is_err());

        assert!(EnvManager::validate_env_var("HSTATS_SENTINEL_MS", "10000").is_ok());
        assert!(EnvManager::validate_env_var("HSTATS_SENTINEL_MS", "-1").is_err());

        assert!(EnvManager::validate_env_var("HSTATS_PLATFORM", "bsd").is_ok());
        assert!(EnvManager::validate_env_var("HSTATS_PLATFORM", "amiga").is_err());

        assert!(EnvManager::validate_env_var("HSTATS_PING", "").is_err());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());
    }
}
