//! Products
//!
//! Read-mostly catalog of downloadable designs, plus the localized views and read cache
//! shared with carts and orders.

pub mod cache;
pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod view;

pub use cache::CatalogCache;
pub use errors::ProductsServiceError;
pub use service::*;
