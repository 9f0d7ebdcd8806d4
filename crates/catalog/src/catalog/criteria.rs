//! Per-request filter criteria.

use rust_decimal::Decimal;

/// Filter criteria for one catalog request. Every field is optional and
/// independent; absent criteria never narrow the result. Constructed fresh
/// per request and discarded after use.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive name substring.
    pub name: Option<String>,

    pub brands: Vec<String>,
    pub colors: Vec<String>,
    pub memories: Vec<String>,
    pub screen_sizes: Vec<String>,
    pub battery_capacities: Vec<String>,
    pub operating_systems: Vec<String>,

    /// Category names (matched through the product→category relationship).
    pub categories: Vec<String>,

    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Normalize all criteria: list tokens arrive as raw, possibly
    /// inconsistently-cased query parameters, so they are trimmed and
    /// lowercased before any membership comparison. Empty tokens and an
    /// empty/blank name are dropped entirely.
    pub fn normalized(self) -> Self {
        Self {
            name: self
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            brands: normalize_tokens(self.brands),
            colors: normalize_tokens(self.colors),
            memories: normalize_tokens(self.memories),
            screen_sizes: normalize_tokens(self.screen_sizes),
            battery_capacities: normalize_tokens(self.battery_capacities),
            operating_systems: normalize_tokens(self.operating_systems),
            categories: normalize_tokens(self.categories),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

fn normalize_tokens(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}
