//! Cart Handlers

pub(crate) mod add;
pub(crate) mod apply_coupon;
pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod remove;
pub(crate) mod remove_coupon;
pub(crate) mod update;
