//! Which of the provider's units to show first

use crate::data::Current;

/// Primary unit system for cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Units {
    /// °F, mph, miles, inHg
    #[default]
    Imperial,
    /// °C, km/h, km, mb
    Metric,
}

impl Units {
    /// Parse a unit name from user input
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "f" | "imperial" | "fahrenheit" => Some(Units::Imperial),
            "c" | "metric" | "celsius" => Some(Units::Metric),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Units::Imperial => Units::Metric,
            Units::Metric => Units::Imperial,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Units::Imperial => "°F",
            Units::Metric => "°C",
        }
    }

    /// Main temperature, rounded
    pub fn temperature(&self, current: &Current) -> String {
        match self {
            Units::Imperial => format!("{}°F", whole(current.temp_f)),
            Units::Metric => format!("{}°C", whole(current.temp_c)),
        }
    }

    /// The same temperature in the other unit
    pub fn secondary_temperature(&self, current: &Current) -> String {
        self.toggle().temperature(current)
    }

    pub fn feels_like(&self, current: &Current) -> String {
        match self {
            Units::Imperial => format!("Feels like {}°F", whole(current.feelslike_f)),
            Units::Metric => format!("Feels like {}°C", whole(current.feelslike_c)),
        }
    }

    pub fn wind(&self, current: &Current) -> String {
        match self {
            Units::Imperial => format!("{} mph {}", whole(current.wind_mph), current.wind_dir),
            Units::Metric => format!("{} km/h {}", whole(current.wind_kph), current.wind_dir),
        }
    }

    pub fn visibility(&self, current: &Current) -> String {
        match self {
            Units::Imperial => format!("{} mi", current.vis_miles),
            Units::Metric => format!("{} km", current.vis_km),
        }
    }

    pub fn pressure(&self, current: &Current) -> String {
        match self {
            Units::Imperial => format!("{:.2} in", current.pressure_in),
            Units::Metric => format!("{} mb", whole(current.pressure_mb)),
        }
    }
}

/// Rounds for display, without printing "-0"
fn whole(value: f64) -> f64 {
    value.round() + 0.0
}
