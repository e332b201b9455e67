//! Static city data
//!
//! The quick-select default set and the catalog used for search-box
//! autocompletion. Neither is derived from fetched data.

/// Cities loaded on startup and offered as quick-select buttons
pub static DEFAULT_CITIES: [&str; 6] = ["New York", "London", "Tokyo", "Sydney", "Dubai", "Mumbai"];

/// Reference list of city names offered as search suggestions
pub static CITY_CATALOG: [&str; 80] = [
    "Abu Dhabi",
    "Amsterdam",
    "Athens",
    "Atlanta",
    "Auckland",
    "Bangkok",
    "Barcelona",
    "Beijing",
    "Berlin",
    "Bogota",
    "Boston",
    "Brussels",
    "Budapest",
    "Buenos Aires",
    "Cairo",
    "Calgary",
    "Cape Town",
    "Casablanca",
    "Chicago",
    "Copenhagen",
    "Dallas",
    "Delhi",
    "Denver",
    "Dhaka",
    "Dubai",
    "Dublin",
    "Edinburgh",
    "Helsinki",
    "Ho Chi Minh City",
    "Hong Kong",
    "Houston",
    "Istanbul",
    "Jakarta",
    "Johannesburg",
    "Karachi",
    "Kuala Lumpur",
    "Kyiv",
    "Lagos",
    "Lima",
    "Lisbon",
    "London",
    "Los Angeles",
    "Madrid",
    "Manila",
    "Melbourne",
    "Mexico City",
    "Miami",
    "Milan",
    "Montreal",
    "Moscow",
    "Mumbai",
    "Munich",
    "Nairobi",
    "New York",
    "Osaka",
    "Oslo",
    "Ottawa",
    "Paris",
    "Perth",
    "Prague",
    "Reykjavik",
    "Rio de Janeiro",
    "Rome",
    "San Francisco",
    "Santiago",
    "Sao Paulo",
    "Seattle",
    "Seoul",
    "Shanghai",
    "Singapore",
    "Stockholm",
    "Sydney",
    "Taipei",
    "Tokyo",
    "Toronto",
    "Vancouver",
    "Victoria",
    "Vienna",
    "Warsaw",
    "Zurich",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_no_duplicates() {
        let unique: HashSet<&str> = CITY_CATALOG.iter().copied().collect();
        assert_eq!(unique.len(), CITY_CATALOG.len());
    }

    #[test]
    fn test_defaults_are_in_catalog() {
        for city in DEFAULT_CITIES {
            assert!(CITY_CATALOG.contains(&city), "{} missing from catalog", city);
        }
    }
}
