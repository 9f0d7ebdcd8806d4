//! Product model and response projection.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A product row as stored.
///
/// The attribute columns (memory, screen size, battery, OS, color) are
/// category-dependent free text; not all product kinds populate all of them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique identifier, immutable after creation.
    pub id: i64,

    pub name: String,
    pub brand: String,

    /// Decimal price, non-negative by schema check.
    pub price: Decimal,

    pub image: String,
    pub description: String,
    pub memory: Option<String>,
    pub screen_size: Option<String>,
    pub battery_capacity: Option<String>,
    pub operating_system: Option<String>,
    pub color: Option<String>,

    /// Owning category.
    pub category_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product row joined with its category name, as returned by catalog
/// queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub image: String,
    pub description: String,
    pub memory: Option<String>,
    pub screen_size: Option<String>,
    pub battery_capacity: Option<String>,
    pub operating_system: Option<String>,
    pub color: Option<String>,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product as serialized in API responses: scalar attributes, category name
/// rather than id, and the read-time average rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub price: Decimal,
    pub image: String,
    pub description: String,
    pub memory: Option<String>,
    pub screen_size: Option<String>,
    pub battery_capacity: Option<String>,
    pub operating_system: Option<String>,
    pub color: Option<String>,
    pub category: String,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    /// Columns selected by catalog queries, in `FromRow` order.
    pub const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "brand",
        "price",
        "image",
        "description",
        "memory",
        "screen_size",
        "battery_capacity",
        "operating_system",
        "color",
        "created_at",
        "updated_at",
    ];

    /// Build the response projection, attaching the computed average rating.
    pub fn into_response(self, average_rating: f64) -> ProductResponse {
        ProductResponse {
            id: self.id,
            name: self.name,
            brand: self.brand,
            price: self.price,
            image: self.image,
            description: self.description,
            memory: self.memory,
            screen_size: self.screen_size,
            battery_capacity: self.battery_capacity,
            operating_system: self.operating_system,
            color: self.color,
            category: self.category_name,
            average_rating,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Product {
    /// Find a product by id, joined with its category name.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ProductRecord>> {
        let record = sqlx::query_as::<_, ProductRecord>(
            r#"
            SELECT p.id, p.name, p.brand, p.price, p.image, p.description,
                   p.memory, p.screen_size, p.battery_capacity,
                   p.operating_system, p.color, c.name AS category_name,
                   p.created_at, p.updated_at
            FROM products p
            INNER JOIN categories c ON p.category_id = c.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch product")?;

        Ok(record)
    }
}
