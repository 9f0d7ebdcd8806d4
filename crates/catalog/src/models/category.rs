//! Category model.
//!
//! Categories group products into kinds (Cellular, TV, Headphones, Laptop).
//! Names are unique case-insensitively; products reference exactly one
//! category.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique identifier.
    pub id: i64,

    /// Unique, case-insensitive name.
    pub name: String,
}

impl Category {
    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let categories =
            sqlx::query_as::<_, Self>("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(pool)
                .await
                .context("failed to list categories")?;

        Ok(categories)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn category_serialization() {
        let category = Category {
            id: 1,
            name: "Cellular".to_string(),
        };

        let json = serde_json::to_string(&category).unwrap();
        assert!(json.contains("Cellular"));

        let parsed: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Cellular");
    }
}
