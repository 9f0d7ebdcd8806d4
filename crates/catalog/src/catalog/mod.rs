//! The catalog query engine.
//!
//! Turns per-request filter criteria plus pagination and sort directives
//! into one consistent, correctly-ordered page of products:
//! - criteria: per-request filter values and their normalization
//! - sort: sort key / direction parsing
//! - page: pagination validation and the page envelope
//! - query: dynamic SQL construction (sea-query)
//! - service: price bound resolution, sort & page planning, execution

mod criteria;
mod page;
mod query;
mod service;
mod sort;

pub use criteria::ProductFilter;
pub use page::{Page, PageRequest};
pub use query::{PriceBounds, ProductQuery};
pub use service::{CatalogService, FilterOptions, RatingSortStrategy};
pub use sort::{SortDirection, SortKey};
