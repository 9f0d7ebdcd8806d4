//! Vetrina catalog service
//!
//! Product catalog queries over PostgreSQL: composable attribute filters,
//! price-range clamping, rating-aware sorting, and paged responses, exposed
//! through a small JSON API.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
