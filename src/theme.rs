//! Weather condition to background theme mapping

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Visual background derived from a city's current condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Sunny,
    ClearNight,
    Rainy,
    Cloudy,
    Snowy,
}

impl Theme {
    /// Stable identifier for the theme
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::ClearNight => "clear-night",
            Theme::Rainy => "rainy",
            Theme::Cloudy => "cloudy",
            Theme::Snowy => "snowy",
        }
    }

    /// Background colour painted behind the dashboard
    pub fn background(&self) -> Color {
        match self {
            Theme::Sunny => Color::Rgb(30, 90, 160),
            Theme::ClearNight => Color::Rgb(15, 20, 45),
            Theme::Rainy => Color::Rgb(45, 55, 70),
            Theme::Cloudy => Color::Rgb(80, 90, 105),
            Theme::Snowy => Color::Rgb(110, 130, 150),
        }
    }

    /// Accent colour for borders and highlights
    pub fn accent(&self) -> Color {
        match self {
            Theme::Sunny => Color::Yellow,
            Theme::ClearNight => Color::LightMagenta,
            Theme::Rainy => Color::LightBlue,
            Theme::Cloudy => Color::Gray,
            Theme::Snowy => Color::White,
        }
    }

    /// Short glyph shown next to the theme name
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Sunny => "\u{2600}",       // ☀
            Theme::ClearNight => "\u{263E}",  // ☾
            Theme::Rainy => "\u{1F327}",      // 🌧
            Theme::Cloudy => "\u{2601}",      // ☁
            Theme::Snowy => "\u{2744}",       // ❄
        }
    }
}

/// Maps a condition description and day/night flag to a theme
///
/// Keyword groups are checked in a fixed order and the first hit wins:
/// sunny/clear, rain/drizzle, cloud/overcast, snow/blizzard. Anything else
/// falls back to [`Theme::Sunny`].
pub fn classify(condition: &str, is_day: bool) -> Theme {
    let text = condition.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

    if has(&["sunny", "clear"]) {
        if is_day {
            Theme::Sunny
        } else {
            Theme::ClearNight
        }
    } else if has(&["rain", "drizzle"]) {
        Theme::Rainy
    } else if has(&["cloud", "overcast"]) {
        Theme::Cloudy
    } else if has(&["snow", "blizzard"]) {
        Theme::Snowy
    } else {
        Theme::Sunny
    }
}
