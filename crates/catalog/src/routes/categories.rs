//! Category listing endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::CatalogResult;
use crate::models::Category;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/categories", get(list_categories))
}

/// GET /api/v1/categories
async fn list_categories(State(state): State<AppState>) -> CatalogResult<Json<Vec<Category>>> {
    let categories = Category::list(state.db()).await?;
    Ok(Json(categories))
}
