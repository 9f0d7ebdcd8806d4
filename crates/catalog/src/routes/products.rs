//! Product listing and lookup endpoints.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::catalog::{Page, PageRequest, SortDirection, SortKey};
use crate::error::CatalogResult;
use crate::models::ProductResponse;
use crate::routes::params;
use crate::state::AppState;

/// Every parameter the listing endpoint accepts. Anything else is a 400.
const LIST_PARAMS: &[&str] = &[
    "name",
    "brand",
    "minPrice",
    "maxPrice",
    "color",
    "memory",
    "screenSize",
    "batteryCapacity",
    "operatingSystem",
    "category",
    "pageNumber",
    "pageSize",
    "sortDir",
    "sortBy",
];

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/{id}", get(get_product))
}

/// GET /api/v1/products
///
/// Filtered, sorted, paged product listing.
async fn list_products(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> CatalogResult<Json<Page<ProductResponse>>> {
    let params = params::collect(pairs, LIST_PARAMS)?;

    let filter = params::product_filter(&params)?;

    let number = params::integer(&params, "pageNumber", 0)?;
    let size = params::integer(&params, "pageSize", i64::from(state.config().default_page_size))?;
    let page = PageRequest::new(number, size, state.config().max_page_size)?;

    let sort = match params::single(&params, "sortBy")? {
        Some(token) => SortKey::parse(&token)?,
        None => SortKey::Id,
    };
    let direction = match params::single(&params, "sortDir")? {
        Some(token) => SortDirection::parse(&token)?,
        None => SortDirection::Asc,
    };

    let page = state
        .catalog()
        .find_products(filter, page, sort, direction)
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> CatalogResult<Json<ProductResponse>> {
    let product = state.catalog().product_by_id(id).await?;
    Ok(Json(product))
}
