//! Catalog data models.

mod category;
mod product;
mod rating;

pub use category::Category;
pub use product::{Product, ProductRecord, ProductResponse};
pub use rating::{Rating, averages_for, mean};
