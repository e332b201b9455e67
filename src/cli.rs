//! Command-line interface parsing for citywx
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the [`StartupConfig`] the application is built from.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::data::weather::DEFAULT_BASE_URL;
use crate::data::Coordinates;
use crate::refresh::{RefreshConfig, DEFAULT_REFRESH_INTERVAL};
use crate::units::Units;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// No provider key on the command line or in the environment
    #[error("Missing API key: pass --api-key or set WEATHERAPI_KEY")]
    MissingApiKey,

    /// The specified unit name is not recognized
    #[error("Invalid units: '{0}'. Valid units: f, c, imperial, metric")]
    InvalidUnits(String),

    /// Refresh interval of zero seconds
    #[error("Refresh interval must be at least one second")]
    InvalidInterval,
}

/// citywx - Current weather for cities around the world
#[derive(Parser, Debug)]
#[command(name = "citywx")]
#[command(about = "Terminal dashboard of current weather for cities worldwide")]
#[command(version)]
pub struct Cli {
    /// WeatherAPI.com API key
    #[arg(long, env = "WEATHERAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Current-conditions endpoint
    #[arg(long, env = "WEATHERAPI_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// City to feature on startup
    #[arg(long, value_name = "CITY", default_value = "New York")]
    pub featured: String,

    /// Primary units: f/imperial or c/metric
    #[arg(long, value_name = "UNITS", default_value = "f")]
    pub units: String,

    /// Seconds between automatic refreshes of the displayed cities
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
    pub refresh_interval: u64,

    /// Disable automatic refresh
    #[arg(long)]
    pub no_refresh: bool,

    /// Latitude used by "use my location" instead of an IP lookup
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude used by "use my location" instead of an IP lookup
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Never look up the location by IP address
    #[arg(long)]
    pub no_ip_lookup: bool,

    /// Write logs to this file (filter with CITYWX_LOG)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Where "use my location" gets its coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource {
    /// Coordinates given on the command line
    Fixed(Coordinates),
    /// Public IP geolocation
    IpLookup,
    /// Location lookups always fail
    Disabled,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub api_key: String,
    pub api_url: String,
    /// City featured before anything is selected
    pub featured: String,
    pub units: Units,
    pub refresh: RefreshConfig,
    pub location: LocationSource,
    pub log_file: Option<PathBuf>,
}

/// Parses a units string argument into a Units enum.
pub fn parse_units_arg(s: &str) -> Result<Units, CliError> {
    Units::from_str(s).ok_or_else(|| CliError::InvalidUnits(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the key is missing or a value is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let api_key = cli
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(CliError::MissingApiKey)?;

        let units = parse_units_arg(&cli.units)?;

        if cli.refresh_interval == 0 {
            return Err(CliError::InvalidInterval);
        }
        let refresh = RefreshConfig {
            interval: Duration::from_secs(cli.refresh_interval),
            enabled: !cli.no_refresh,
        };

        let location = match (cli.lat, cli.lon) {
            (Some(latitude), Some(longitude)) => LocationSource::Fixed(Coordinates {
                latitude,
                longitude,
            }),
            _ if cli.no_ip_lookup => LocationSource::Disabled,
            _ => LocationSource::IpLookup,
        };

        Ok(StartupConfig {
            api_key,
            api_url: cli.api_url.clone(),
            featured: cli.featured.clone(),
            units,
            refresh,
            location,
            log_file: cli.log_file.clone(),
        })
    }
}
