//! Shopper identity
//!
//! Bearer tokens identify users; the `X-Session-ID` header identifies guests.

pub(crate) mod middleware;
pub(crate) mod session;
