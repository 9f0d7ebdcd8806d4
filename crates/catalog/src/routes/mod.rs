//! HTTP routes.
//!
//! Handlers are thin: collect and validate query parameters against the
//! endpoint's allow-list, delegate to the catalog service, map errors.

mod categories;
mod filters;
mod health;
mod params;
mod products;

use axum::Router;

use crate::state::AppState;

/// Create the application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(filters::router())
        .merge(categories::router())
        .merge(health::router())
}
