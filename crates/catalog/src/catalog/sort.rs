//! Sort key and direction parsing.
//!
//! Both are validated before any query executes: a direction other than
//! asc/desc and a key outside the fixed set are caller errors, never a
//! silent default.

use sea_query::Order;

use crate::error::CatalogError;

/// Sort direction. The request token must be exactly "asc" or "desc",
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(token: &str) -> Result<Self, CatalogError> {
        if token.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(CatalogError::InvalidSort(format!(
                "sortDir must be 'asc' or 'desc', got '{token}'"
            )))
        }
    }

    pub fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Sortable product properties. Request tokens are the API property names
/// (camelCase), matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    Brand,
    Price,
    Memory,
    ScreenSize,
    BatteryCapacity,
    OperatingSystem,
    Color,
    CreatedAt,
    UpdatedAt,
    /// Derived from the ratings relation; not a stored column, so it cannot
    /// be pushed down as a plain ORDER BY.
    Rating,
}

impl SortKey {
    pub fn parse(token: &str) -> Result<Self, CatalogError> {
        let key = match token.to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "name" => Self::Name,
            "brand" => Self::Brand,
            "price" => Self::Price,
            "memory" => Self::Memory,
            "screensize" => Self::ScreenSize,
            "batterycapacity" => Self::BatteryCapacity,
            "operatingsystem" => Self::OperatingSystem,
            "color" => Self::Color,
            "createdat" => Self::CreatedAt,
            "updatedat" => Self::UpdatedAt,
            "rating" | "ratings" => Self::Rating,
            _ => {
                return Err(CatalogError::InvalidSort(format!(
                    "unknown sortBy property '{token}'"
                )));
            }
        };
        Ok(key)
    }

    /// Stored column backing this key, or None for the derived rating key.
    pub fn column(self) -> Option<&'static str> {
        match self {
            Self::Id => Some("id"),
            Self::Name => Some("name"),
            Self::Brand => Some("brand"),
            Self::Price => Some("price"),
            Self::Memory => Some("memory"),
            Self::ScreenSize => Some("screen_size"),
            Self::BatteryCapacity => Some("battery_capacity"),
            Self::OperatingSystem => Some("operating_system"),
            Self::Color => Some("color"),
            Self::CreatedAt => Some("created_at"),
            Self::UpdatedAt => Some("updated_at"),
            Self::Rating => None,
        }
    }
}
