//! Search-box autocompletion over the static city catalog

/// Upper bound on the number of suggestions shown
pub const MAX_SUGGESTIONS: usize = 10;

/// Returns catalog names containing `query`, best matches first
///
/// Names that start with the query come before names that merely contain
/// it; each group is sorted alphabetically. A blank query yields nothing.
pub fn suggest<'a>(query: &str, catalog: &[&'a str]) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let (mut prefixed, mut contained): (Vec<&str>, Vec<&str>) = catalog
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().contains(&query))
        .partition(|name| name.to_lowercase().starts_with(&query));

    let alphabetical = |a: &&str, b: &&str| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    };
    prefixed.sort_by(alphabetical);
    contained.sort_by(alphabetical);

    prefixed
        .into_iter()
        .chain(contained)
        .take(MAX_SUGGESTIONS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CITY_CATALOG;

    #[test]
    fn test_starts_with_before_contains() {
        let catalog = ["Victoria", "Toronto", "Paris"];
        assert_eq!(suggest("tor", &catalog), vec!["Toronto", "Victoria"]);
    }

    #[test]
    fn test_alphabetical_within_groups() {
        let catalog = ["Londonderry", "Wollongong", "London", "Along", "Long Beach"];
        assert_eq!(
            suggest("lon", &catalog),
            vec!["London", "Londonderry", "Long Beach", "Along", "Wollongong"]
        );
    }

    #[test]
    fn test_case_insensitive_query() {
        let catalog = ["Tokyo", "Kyoto"];
        assert_eq!(suggest("TOK", &catalog), vec!["Tokyo"]);
        assert_eq!(suggest("  kyo ", &catalog), vec!["Kyoto", "Tokyo"]);
    }

    #[test]
    fn test_blank_query_yields_nothing() {
        assert!(suggest("", &CITY_CATALOG).is_empty());
        assert!(suggest("   ", &CITY_CATALOG).is_empty());
    }

    #[test]
    fn test_no_match_yields_nothing() {
        assert!(suggest("zzz", &CITY_CATALOG).is_empty());
    }

    #[test]
    fn test_capped_at_max() {
        let results = suggest("a", &CITY_CATALOG);
        assert_eq!(results.len(), MAX_SUGGESTIONS);
        // names starting with "a" lead the list
        assert_eq!(results[0], "Abu Dhabi");
        assert!(results.iter().take(4).all(|n| n.to_lowercase().starts_with('a')));
    }

    #[test]
    fn test_catalog_lookup() {
        assert_eq!(suggest("par", &CITY_CATALOG), vec!["Paris"]);
        assert_eq!(suggest("tor", &CITY_CATALOG), vec!["Toronto", "Victoria"]);
    }
}
