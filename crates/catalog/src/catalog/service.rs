//! Catalog service: executes composed queries and assembles page envelopes.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use super::criteria::ProductFilter;
use super::page::{Page, PageRequest, ensure_in_bounds, total_pages};
use super::query::{PriceBounds, ProductQuery};
use super::sort::{SortDirection, SortKey};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{self, Product, ProductRecord, ProductResponse, Rating};

/// How the rating sort is executed.
///
/// Rating is derived from a one-to-many relation, not a stored column, so a
/// plain ORDER BY cannot express it. The default pushes the aggregation into
/// the store; the in-memory strategy exists for stores that cannot combine
/// GROUP BY + AVG + ORDER BY + LIMIT in one query. Both observe the same
/// ordering contract: ties keep their id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingSortStrategy {
    #[default]
    Aggregate,
    InMemory,
}

/// Filter options available within a filtered catalog slice, serialized in
/// the store's wire format. Lists are distinct, first-occurrence ordered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub brands: Vec<String>,
    /// Effective [min, max] price over the filtered set.
    pub prices: [Decimal; 2],
    pub colors: Vec<String>,
    pub memories: Vec<String>,
    pub screen_sizes: Vec<String>,
    pub battery_capacities: Vec<String>,
    pub operating_systems: Vec<String>,
    pub categories: Vec<String>,
}

/// Read-only catalog query service. Stateless between requests; concurrent
/// requests need no coordination because the engine performs no writes.
#[derive(Clone)]
pub struct CatalogService {
    pool: PgPool,
    rating_sort: RatingSortStrategy,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            rating_sort: RatingSortStrategy::default(),
        }
    }

    pub fn with_rating_sort(mut self, strategy: RatingSortStrategy) -> Self {
        self.rating_sort = strategy;
        self
    }

    /// Find products matching the criteria, sorted and paged.
    pub async fn find_products(
        &self,
        filter: ProductFilter,
        page: PageRequest,
        sort: SortKey,
        direction: SortDirection,
    ) -> CatalogResult<Page<ProductResponse>> {
        let query = ProductQuery::new(filter);
        let bounds = self.resolve_price_bounds(&query).await?;

        let total: i64 = sqlx::query_scalar(&query.count_sql(bounds))
            .fetch_one(&self.pool)
            .await?;
        let total = u64::try_from(total).unwrap_or(0);
        ensure_in_bounds(page.number, total_pages(total, page.size))?;

        tracing::debug!(
            total,
            page = page.number,
            size = page.size,
            sort = ?sort,
            "catalog query"
        );

        let records = match sort.column() {
            Some(column) => {
                let sql = query.page_sql(bounds, column, direction, page.limit(), page.offset());
                sqlx::query_as::<_, ProductRecord>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => self.rating_sorted_page(&query, bounds, direction, page).await?,
        };

        let items = self.attach_ratings(records).await?;
        Ok(Page::new(items, total, page))
    }

    /// Distinct attribute values and the effective price range for the
    /// filtered set.
    pub async fn filter_options(&self, filter: ProductFilter) -> CatalogResult<FilterOptions> {
        let query = ProductQuery::new(filter);
        let bounds = self.resolve_price_bounds(&query).await?;

        let records = sqlx::query_as::<_, ProductRecord>(&query.all_sql(bounds))
            .fetch_all(&self.pool)
            .await?;

        Ok(assemble_filter_options(&records, bounds))
    }

    /// Single product by id with category name and computed average rating.
    pub async fn product_by_id(&self, id: i64) -> CatalogResult<ProductResponse> {
        let record = Product::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))?;

        let averages = models::averages_for(&self.pool, &[record.id]).await?;
        let average = averages.get(&record.id).copied().unwrap_or(0.0);
        Ok(record.into_response(average))
    }

    /// Resolve the effective price bounds for a request: aggregate MIN/MAX
    /// over the non-price-filtered set, then clamp the requested bounds into
    /// that range. No matching records means there is nothing to aggregate
    /// over, which is a distinct caller-visible condition.
    async fn resolve_price_bounds(&self, query: &ProductQuery) -> CatalogResult<PriceBounds> {
        let (observed_min, observed_max): (Option<Decimal>, Option<Decimal>) =
            sqlx::query_as(&query.price_bounds_sql())
                .fetch_one(&self.pool)
                .await?;

        match (observed_min, observed_max) {
            (Some(min), Some(max)) => Ok(PriceBounds::resolve(
                min,
                max,
                query.filter().min_price,
                query.filter().max_price,
            )),
            _ => Err(CatalogError::NoMatchingProducts),
        }
    }

    /// The aggregate-sort path for the derived rating key.
    async fn rating_sorted_page(
        &self,
        query: &ProductQuery,
        bounds: PriceBounds,
        direction: SortDirection,
        page: PageRequest,
    ) -> CatalogResult<Vec<ProductRecord>> {
        match self.rating_sort {
            RatingSortStrategy::Aggregate => {
                let sql = query.rating_page_sql(bounds, direction, page.limit(), page.offset());
                Ok(sqlx::query_as::<_, ProductRecord>(&sql)
                    .fetch_all(&self.pool)
                    .await?)
            }
            RatingSortStrategy::InMemory => {
                let all = sqlx::query_as::<_, ProductRecord>(&query.all_sql(bounds))
                    .fetch_all(&self.pool)
                    .await?;
                let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
                let ratings = Rating::list_for_products(&self.pool, &ids).await?;
                let averages = mean_by_product(&ratings);

                Ok(sort_by_rating_and_slice(
                    all,
                    &averages,
                    direction,
                    page.offset(),
                    page.limit(),
                ))
            }
        }
    }

    /// Attach read-time average ratings to a page of records in one
    /// aggregate query.
    async fn attach_ratings(
        &self,
        records: Vec<ProductRecord>,
    ) -> CatalogResult<Vec<ProductResponse>> {
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let averages = models::averages_for(&self.pool, &ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let average = averages.get(&record.id).copied().unwrap_or(0.0);
                record.into_response(average)
            })
            .collect())
    }
}

/// Group ratings by product and compute each mean.
fn mean_by_product(ratings: &[Rating]) -> HashMap<i64, f64> {
    let mut values: HashMap<i64, Vec<i16>> = HashMap::new();
    for rating in ratings {
        values.entry(rating.product_id).or_default().push(rating.rating);
    }

    values
        .into_iter()
        .map(|(id, values)| (id, models::mean(&values)))
        .collect()
}

/// Stable sort by average rating, then slice out the requested page.
/// Unrated products sort as 0; ties keep their input (id) order.
fn sort_by_rating_and_slice(
    mut records: Vec<ProductRecord>,
    averages: &HashMap<i64, f64>,
    direction: SortDirection,
    offset: u64,
    limit: u64,
) -> Vec<ProductRecord> {
    let rating_of = |record: &ProductRecord| averages.get(&record.id).copied().unwrap_or(0.0);

    records.sort_by(|a, b| {
        let ordering = rating_of(a).total_cmp(&rating_of(b));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    records
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

/// Distinct filter options over fetched records, first occurrence wins.
fn assemble_filter_options(records: &[ProductRecord], bounds: PriceBounds) -> FilterOptions {
    FilterOptions {
        brands: distinct(records.iter().map(|r| Some(r.brand.clone()))),
        prices: [bounds.min, bounds.max],
        colors: distinct(records.iter().map(|r| r.color.clone())),
        memories: distinct(records.iter().map(|r| r.memory.clone())),
        screen_sizes: distinct(records.iter().map(|r| r.screen_size.clone())),
        battery_capacities: distinct(records.iter().map(|r| r.battery_capacity.clone())),
        operating_systems: distinct(records.iter().map(|r| r.operating_system.clone())),
        categories: distinct(records.iter().map(|r| Some(r.category_name.clone()))),
    }
}

fn distinct(values: impl Iterator<Item = Option<String>>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values.flatten() {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
