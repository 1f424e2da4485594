//! Coupon Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::coupons::records::{CouponType, CouponUuid};

/// New Coupon Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub uuid: CouponUuid,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: CouponType,
    pub value: Decimal,
    pub minimum_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub user_limit: Option<i32>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
}
