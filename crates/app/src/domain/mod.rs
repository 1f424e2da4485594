//! Storefront Domain Concerns

pub mod carts;
pub mod coupons;
pub mod orders;
pub mod pricing;
pub mod products;
pub mod users;
