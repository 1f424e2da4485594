//! Orders
//!
//! Checkout turns the shopper's cart into an immutable order. Prices, discounts and
//! totals are always recomputed from live data before anything is written.

pub mod data;
pub mod errors;
pub mod finalizer;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
