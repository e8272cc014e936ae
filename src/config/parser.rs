//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        self.cli.validate().map_err(AppError::config)?;

        let mut config = Config::default();

        self.load_env_file()?;
        EnvManager::validate_environment()?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref infile) = self.cli.infile {
            config.infile = infile.clone();
        }

        if let Some(concurrency) = self.cli.concurrency {
            config.concurrency = concurrency;
        }

        if let Some(count) = self.cli.count {
            config.probe_count = count;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(sentinel) = self.cli.sentinel {
            config.sentinel_ms = sentinel;
        }

        if let Some(ref ping) = self.cli.ping {
            config.probe_program = ping.clone();
        }

        if let Some(platform) = self.cli.platform {
            config.platform = Some(platform);
        }

        config.output_format = self.cli.format;
        config.enable_color = self.cli.use_colors();

        // These are CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Input: {}", config.infile));
    summary.push(format!("Concurrency: {}", config.concurrency));
    summary.push(format!("Probe Count: {}", config.probe_count));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Sentinel: {:.0}ms", config.sentinel_ms));
    summary.push(format!("Probe Program: {}", config.probe_program));
    summary.push(format!("Platform: {}", config.platform_format()));
    summary.push(format!("Output: {:?}", config.output_format));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
