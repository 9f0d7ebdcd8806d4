//! Filter-options endpoint.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::catalog::FilterOptions;
use crate::error::CatalogResult;
use crate::routes::params;
use crate::state::AppState;

/// Filter criteria only; pagination and sort parameters make no sense here.
const FILTER_PARAMS: &[&str] = &[
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
];

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/filters", get(filter_options))
}

/// GET /api/v1/filters
///
/// Distinct attribute values and the effective price range for the set of
/// products matching the given criteria.
async fn filter_options(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> CatalogResult<Json<FilterOptions>> {
    let params = params::collect(pairs, FILTER_PARAMS)?;
    let filter = params::product_filter(&params)?;

    let options = state.catalog().filter_options(filter).await?;
    Ok(Json(options))
}
