//! Command-line interface parsing for the uptime dashboard
//!
//! This module handles parsing of CLI arguments using clap and turning them
//! into the startup configuration for the refresh pipeline.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::{default_config_dir, Config};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The refresh interval must be at least one second
    #[error("Invalid interval: '{0}'. The refresh interval must be at least 1 second")]
    InvalidInterval(u64),

    /// No configuration directory was given and none could be determined
    #[error("Could not determine a configuration directory; pass --config-dir")]
    NoConfigDir,
}

/// Uptime Checker - UptimeRobot monitors in your terminal
#[derive(Parser, Debug)]
#[command(name = "uptime-checker")]
#[command(about = "Show UptimeRobot monitor status in a live terminal table")]
#[command(version)]
pub struct Cli {
    /// Your UptimeRobot readonly access token
    ///
    /// The token is saved and reused on later runs. When omitted, the saved
    /// token is used, then the UPTIMEROBOT_TOKEN environment variable.
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Refresh automatically every SECONDS
    ///
    /// Without this flag data is loaded once at startup and on `r`.
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Directory for the saved token, cache and log file
    #[arg(long, value_name = "PATH")]
    pub config_dir: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Token given on the command line, if any
    pub token: Option<String>,
    /// Pipeline configuration
    pub config: Config,
}

/// Parses the `--interval` argument into a refresh period.
///
/// # Returns
/// * `Ok(Duration)` for any positive number of seconds
/// * `Err(CliError::InvalidInterval)` for zero
pub fn parse_interval_arg(seconds: u64) -> Result<Duration, CliError> {
    if seconds == 0 {
        return Err(CliError::InvalidInterval(seconds));
    }
    Ok(Duration::from_secs(seconds))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an argument is invalid or no config dir exists
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config_dir = match &cli.config_dir {
            Some(dir) => dir.clone(),
            None => default_config_dir().ok_or(CliError::NoConfigDir)?,
        };

        let mut config = Config::with_dir(config_dir);
        config.refresh_interval = cli.interval.map(parse_interval_arg).transpose()?;

        Ok(StartupConfig {
            token: cli.token.clone(),
            config,
        })
    }
}
