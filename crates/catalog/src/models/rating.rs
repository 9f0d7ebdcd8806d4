//! Rating model and read-time aggregation.
//!
//! The average rating of a product is never stored; it is derived from the
//! ratings collection on every read, so it can never go stale.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A single user rating of a product. At most one per (product, user) pair,
/// enforced by the schema.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    /// Unique identifier.
    pub id: i64,

    /// Rating value in [1, 5].
    pub rating: i16,

    /// Rated product.
    pub product_id: i64,

    /// Rating user.
    pub user_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rating {
    /// Fetch all ratings for the given products.
    pub async fn list_for_products(pool: &PgPool, product_ids: &[i64]) -> Result<Vec<Self>> {
        let ratings = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, rating, product_id, user_id, created_at, updated_at
            FROM ratings
            WHERE product_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(product_ids)
        .fetch_all(pool)
        .await
        .context("failed to fetch ratings")?;

        Ok(ratings)
    }
}

/// Arithmetic mean of rating values; exactly 0 for an unrated product.
///
/// Deterministic: repeated identical requests always report the same value.
pub fn mean(values: &[i16]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    sum as f64 / values.len() as f64
}

/// Average rating per product for the given ids, computed by the store.
/// Products with no ratings are absent from the map and report 0.
pub async fn averages_for(pool: &PgPool, product_ids: &[i64]) -> Result<HashMap<i64, f64>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, f64)> = sqlx::query_as(
        r#"
        SELECT product_id, AVG(rating)::float8
        FROM ratings
        WHERE product_id = ANY($1)
        GROUP BY product_id
        "#,
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await
    .context("failed to aggregate ratings")?;

    Ok(rows.into_iter().collect())
}
