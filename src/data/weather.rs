//! WeatherAPI.com current-conditions client
//!
//! This module fetches current weather for free-text city names or
//! coordinate pairs and turns every failure into one descriptive error per
//! query.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Coordinates, WeatherRecord};

/// Default endpoint for current conditions
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1/current.json";

/// Errors that can occur when fetching weather data
///
/// The `Display` text is what the dashboard shows to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider rejected the request and said why
    #[error("{0}")]
    Provider(String),

    /// Transport failure, unexpected status without a message, or malformed body
    #[error("Failed to fetch weather for {0}")]
    Failed(String),
}

/// Error envelope the provider returns alongside non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Anything that can produce weather records for city queries
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch current weather for a city name or "lat,lon" query
    async fn fetch_city(&self, query: &str) -> Result<WeatherRecord, FetchError>;

    /// Fetch current weather for a coordinate pair
    async fn fetch_coordinates(&self, coords: Coordinates) -> Result<WeatherRecord, FetchError> {
        self.fetch_city(&coords.to_query()).await
    }

    /// Fetch every query concurrently, all-or-nothing
    ///
    /// Waits for all requests to settle. If any failed, the first failure in
    /// query order is returned and no records are.
    async fn fetch_batch(&self, queries: &[String]) -> Result<Vec<WeatherRecord>, FetchError> {
        let futures = queries.iter().map(|q| self.fetch_city(q));
        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }
}

/// Client for the WeatherAPI.com `current.json` endpoint
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Create a new WeatherClient against the public endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request(&self, query: &str) -> Result<WeatherRecord, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("q", query), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| {
                warn!(query, error = %e, "weather request failed");
                FetchError::Failed(query.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!(query, error = %e, "failed to read weather response");
            FetchError::Failed(query.to_string())
        })?;

        if !status.is_success() {
            warn!(query, %status, "provider returned an error status");
            return Err(provider_error(query, &text));
        }

        parse_record(query, &text)
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn fetch_city(&self, query: &str) -> Result<WeatherRecord, FetchError> {
        debug!(query, "fetching weather");
        self.request(query).await
    }
}

/// Parse a success body into a record
fn parse_record(query: &str, body: &str) -> Result<WeatherRecord, FetchError> {
    serde_json::from_str(body).map_err(|e| {
        warn!(query, error = %e, "malformed weather response");
        FetchError::Failed(query.to_string())
    })
}

/// Build the error for a non-success response, preferring the provider's message
fn provider_error(query: &str, body: &str) -> FetchError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            FetchError::Provider(envelope.error.message)
        }
        _ => FetchError::Failed(query.to_string()),
    }
}
