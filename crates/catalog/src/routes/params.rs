//! Query-parameter collection and validation.
//!
//! Every endpoint declares the exact set of parameter names it accepts; any
//! other name is rejected before handler logic runs. List-valued parameters
//! accept both repeated keys and comma-separated tokens.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::catalog::ProductFilter;
use crate::error::{CatalogError, CatalogResult};

/// Collected parameters: name to raw values in arrival order.
pub type Params = HashMap<String, Vec<String>>;

/// Group raw query pairs, rejecting any name outside the allow-list.
pub fn collect(pairs: Vec<(String, String)>, allowed: &[&str]) -> CatalogResult<Params> {
    let mut params: Params = HashMap::new();
    for (key, value) in pairs {
        if !allowed.contains(&key.as_str()) {
            return Err(CatalogError::InvalidProperty(format!(
                "unexpected parameter '{key}'"
            )));
        }
        params.entry(key).or_default().push(value);
    }
    Ok(params)
}

/// Value of a single-valued parameter. Repeating one is a caller error, not
/// a silent first-wins.
pub fn single(params: &Params, key: &str) -> CatalogResult<Option<String>> {
    match params.get(key) {
        None => Ok(None),
        Some(values) if values.len() > 1 => Err(CatalogError::InvalidProperty(format!(
            "parameter '{key}' must not be repeated"
        ))),
        Some(values) => Ok(values.first().cloned()),
    }
}

/// All values for a list parameter, splitting comma-separated tokens.
pub fn list(params: &Params, key: &str) -> Vec<String> {
    params
        .get(key)
        .into_iter()
        .flatten()
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Optional decimal parameter (prices).
pub fn decimal(params: &Params, key: &str) -> CatalogResult<Option<Decimal>> {
    match single(params, key)? {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<Decimal>().map(Some).map_err(|_| {
            CatalogError::InvalidProperty(format!("{key} must be a decimal number, got '{raw}'"))
        }),
    }
}

/// Integer pagination parameter with a default.
pub fn integer(params: &Params, key: &str, default: i64) -> CatalogResult<i64> {
    match single(params, key)? {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
            CatalogError::InvalidPagination(format!("{key} must be an integer, got '{raw}'"))
        }),
    }
}

/// Build filter criteria from collected parameters. Shared by the product
/// listing and filter-options endpoints.
pub fn product_filter(params: &Params) -> CatalogResult<ProductFilter> {
    Ok(ProductFilter {
        name: single(params, "name")?,
        brands: list(params, "brand"),
        colors: list(params, "color"),
        memories: list(params, "memory"),
        screen_sizes: list(params, "screenSize"),
        battery_capacities: list(params, "batteryCapacity"),
        operating_systems: list(params, "operatingSystem"),
        categories: list(params, "category"),
        min_price: decimal(params, "minPrice")?,
        max_price: decimal(params, "maxPrice")?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unexpected_parameter_is_rejected() {
        let err = collect(pairs(&[("weight", "1kg")]), &["name", "brand"]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidProperty(_)));
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn repeated_and_comma_separated_values_merge() {
        let params = collect(
            pairs(&[("brand", "Apple,Samsung"), ("brand", "Sony")]),
            &["brand"],
        )
        .unwrap();

        assert_eq!(list(&params, "brand"), vec!["Apple", "Samsung", "Sony"]);
    }

    #[test]
    fn comma_tokens_are_trimmed_and_blank_dropped() {
        let params = collect(pairs(&[("color", " Black , ,White ")]), &["color"]).unwrap();
        assert_eq!(list(&params, "color"), vec!["Black", "White"]);
    }

    #[test]
    fn bad_decimal_names_the_parameter() {
        let params = collect(pairs(&[("minPrice", "cheap")]), &["minPrice"]).unwrap();
        let err = decimal(&params, "minPrice").unwrap_err();
        assert!(err.to_string().contains("minPrice"));
    }

    #[test]
    fn integer_defaults_when_absent() {
        let params = collect(vec![], &["pageNumber"]).unwrap();
        assert_eq!(integer(&params, "pageNumber", 0).unwrap(), 0);
    }

    #[test]
    fn repeated_single_valued_parameter_is_rejected() {
        let params = collect(
            pairs(&[("sortBy", "price"), ("sortBy", "name")]),
            &["sortBy"],
        )
        .unwrap();
        let err = single(&params, "sortBy").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidProperty(_)));
        assert!(err.to_string().contains("sortBy"));
    }

    #[test]
    fn repeated_price_parameter_is_rejected() {
        let params = collect(
            pairs(&[("minPrice", "10"), ("minPrice", "20")]),
            &["minPrice"],
        )
        .unwrap();
        assert!(decimal(&params, "minPrice").is_err());
    }

    #[test]
    fn bad_integer_is_a_pagination_error() {
        let params = collect(pairs(&[("pageSize", "many")]), &["pageSize"]).unwrap();
        let err = integer(&params, "pageSize", 12).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPagination(_)));
    }

    #[test]
    fn product_filter_collects_all_criteria() {
        let params = collect(
            pairs(&[
                ("name", "phone"),
                ("brand", "Apple"),
                ("minPrice", "99.99"),
                ("category", "Cellular"),
            ]),
            &["name", "brand", "minPrice", "category"],
        )
        .unwrap();

        let filter = product_filter(&params).unwrap();
        assert_eq!(filter.name.as_deref(), Some("phone"));
        assert_eq!(filter.brands, vec!["Apple"]);
        assert_eq!(filter.min_price, Some("99.99".parse().unwrap()));
        assert_eq!(filter.categories, vec!["Cellular"]);
        assert!(filter.max_price.is_none());
    }
}
