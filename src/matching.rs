//! City identity comparison
//!
//! The provider does not hand back a stable city id, so two names are treated
//! as the same city when either contains the other, ignoring case. This
//! tolerates variants like "New York" and "New York City" but is not
//! transitive and can be fooled by short names. Callers go through
//! [`CityIdentity`] so the rule can be replaced by an exact key.

/// Decides whether two city names refer to the same city
pub trait CityIdentity {
    fn same_city(&self, a: &str, b: &str) -> bool;
}

/// Bidirectional case-insensitive substring containment
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyName;

impl CityIdentity for FuzzyName {
    fn same_city(&self, a: &str, b: &str) -> bool {
        matches(a, b)
    }
}

/// True if lower-cased `a` contains lower-cased `b`, or vice versa
pub fn matches(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}
