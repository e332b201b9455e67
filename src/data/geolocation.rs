//! "Use my location" support
//!
//! A terminal has no browser geolocation prompt, so the user's position
//! comes either from coordinates given on the command line or from an
//! IP lookup against ip-api.com.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default IP geolocation endpoint
pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json";

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Provider query string, "lat,lon"
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Errors that can occur while locating the user
#[derive(Debug, Error)]
pub enum LocationError {
    /// Location lookup is switched off
    #[error("Geolocation is not available")]
    Unavailable,

    /// The lookup service refused to locate us
    #[error("Location lookup refused: {0}")]
    Denied(String),

    /// HTTP request failed
    #[error("Location request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Something that can report where the user is
#[async_trait]
pub trait Locator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Reports a fixed position, or refuses when none was configured
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    coords: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.coords.ok_or(LocationError::Unavailable)
    }
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Locates the user by public IP address
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: Client,
    url: String,
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IpLocator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            url: DEFAULT_IP_LOOKUP_URL.to_string(),
        }
    }

    /// Point the locator at a different lookup endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl Locator for IpLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let response: IpApiResponse = self.client.get(&self.url).send().await?.json().await?;
        let coords = parse_ip_response(response)?;
        debug!(lat = coords.latitude, lon = coords.longitude, "located by IP");
        Ok(coords)
    }
}

fn parse_ip_response(response: IpApiResponse) -> Result<Coordinates, LocationError> {
    if response.status != "success" {
        let reason = response.message.unwrap_or_else(|| response.status.clone());
        warn!(%reason, "IP location lookup failed");
        return Err(LocationError::Denied(reason));
    }
    match (response.lat, response.lon) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates {
            latitude,
            longitude,
        }),
        _ => Err(LocationError::Denied("response had no coordinates".to_string())),
    }
}
