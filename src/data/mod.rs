//! Core data models for citywx
//!
//! This module contains the weather snapshot types returned by the provider,
//! the provider and geolocation clients, and the static city lists.

pub mod cities;
pub mod geolocation;
pub mod weather;

pub use cities::{CITY_CATALOG, DEFAULT_CITIES};
pub use geolocation::{Coordinates, FixedLocator, IpLocator, LocationError, Locator};
pub use weather::{FetchError, WeatherClient, WeatherSource};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::theme::{classify, Theme};

/// One weather snapshot for a city, exactly as the provider reports it
///
/// Records are never mutated after they are received; a later fetch for the
/// same city replaces the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Where the snapshot was taken
    pub location: Location,
    /// Current conditions at that location
    pub current: Current,
}

/// Location identity of a weather snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// City name as resolved by the provider
    pub name: String,
    /// Region or state, may be empty
    #[serde(default)]
    pub region: String,
    /// Country name
    #[serde(default)]
    pub country: String,
    /// Local civil time, e.g. "2024-07-15 9:05"
    #[serde(default)]
    pub localtime: String,
    /// IANA timezone id
    #[serde(default)]
    pub tz_id: String,
}

/// Current conditions, in both units the provider supplies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: Condition,
    pub wind_mph: f64,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub pressure_in: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub vis_km: f64,
    pub vis_miles: f64,
}

/// Textual weather condition with the provider's icon reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// English description, e.g. "Light rain"
    pub text: String,
    /// Icon URL; daytime assets live under a `day/` path
    #[serde(default)]
    pub icon: String,
    /// Provider condition code
    #[serde(default)]
    pub code: u32,
}

impl WeatherRecord {
    /// Resolved city name
    pub fn name(&self) -> &str {
        &self.location.name
    }

    /// Whether the provider's icon reference points at a daytime asset
    pub fn is_day(&self) -> bool {
        self.current.condition.icon.contains("day")
    }

    /// Background theme for this snapshot
    pub fn theme(&self) -> Theme {
        classify(&self.current.condition.text, self.is_day())
    }

    /// "Region, Country", or just the country when the region is empty
    pub fn place(&self) -> String {
        if self.location.region.is_empty() {
            self.location.country.clone()
        } else {
            format!("{}, {}", self.location.region, self.location.country)
        }
    }

    /// Local time formatted as "9:05 AM Local Time"
    ///
    /// Falls back to the raw provider string if it cannot be parsed.
    pub fn formatted_local_time(&self) -> String {
        match NaiveDateTime::parse_from_str(&self.location.localtime, "%Y-%m-%d %H:%M") {
            Ok(time) => format!("{} Local Time", time.format("%-I:%M %p")),
            Err(_) => self.location.localtime.clone(),
        }
    }
}

/// Builds a record for tests without going through the provider
#[cfg(test)]
pub fn sample_record(name: &str, condition: &str, icon: &str) -> WeatherRecord {
    WeatherRecord {
        location: Location {
            name: name.to_string(),
            region: String::new(),
            country: "Testland".to_string(),
            localtime: "2024-07-15 14:30".to_string(),
            tz_id: "UTC".to_string(),
        },
        current: Current {
            temp_c: 20.0,
            temp_f: 68.0,
            condition: Condition {
                text: condition.to_string(),
                icon: icon.to_string(),
                code: 1000,
            },
            wind_mph: 5.6,
            wind_kph: 9.0,
            wind_dir: "NW".to_string(),
            pressure_mb: 1015.0,
            pressure_in: 29.97,
            humidity: 60,
            feelslike_c: 19.0,
            feelslike_f: 66.2,
            vis_km: 10.0,
            vis_miles: 6.0,
        },
    }
}
