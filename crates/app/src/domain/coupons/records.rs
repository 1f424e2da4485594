//! Coupon Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{money::round_money, uuids::TypedUuid};

/// Coupon UUID
pub type CouponUuid = TypedUuid<CouponRecord>;

/// How a coupon's value is applied to a subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// `value` is a percentage of the subtotal.
    Percent,
    /// `value` is an amount taken off the subtotal.
    Fixed,
}

impl CouponType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for CouponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown coupon type \"{0}\"")]
pub struct UnknownCouponType(pub String);

impl FromStr for CouponType {
    type Err = UnknownCouponType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percent" => Ok(Self::Percent),
            "fixed" => Ok(Self::Fixed),
            other => Err(UnknownCouponType(other.to_string())),
        }
    }
}

/// Coupon Record
#[derive(Debug, Clone, PartialEq)]
pub struct CouponRecord {
    pub uuid: CouponUuid,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: CouponType,
    pub value: Decimal,
    pub minimum_amount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub usage_count: i32,
    /// Stored for reporting; not enforced.
    pub user_limit: Option<i32>,
    pub starts_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CouponRecord {
    /// Active, inside its date window and under its usage limit at `now`.
    #[must_use]
    pub fn is_valid(&self, now: Timestamp) -> bool {
        self.is_active
            && self.starts_at.is_none_or(|starts_at| now >= starts_at)
            && self.expires_at.is_none_or(|expires_at| now <= expires_at)
            && self
                .usage_limit
                .is_none_or(|usage_limit| self.usage_count < usage_limit)
    }

    /// Whether `subtotal` reaches the coupon's minimum amount, if it has one.
    #[must_use]
    pub fn meets_minimum(&self, subtotal: Decimal) -> bool {
        self.minimum_amount
            .is_none_or(|minimum_amount| subtotal >= minimum_amount)
    }

    /// Discount this coupon grants on `subtotal` at `now`.
    ///
    /// Zero when the coupon is invalid or the minimum is not met. Otherwise rounded to
    /// cents and kept within `0..=subtotal`.
    #[must_use]
    pub fn calculate_discount(&self, subtotal: Decimal, now: Timestamp) -> Decimal {
        if subtotal <= Decimal::ZERO || !self.is_valid(now) || !self.meets_minimum(subtotal) {
            return Decimal::ZERO;
        }

        let discount = match self.kind {
            CouponType::Percent => round_money(subtotal * self.value / Decimal::ONE_HUNDRED),
            CouponType::Fixed => round_money(self.value.min(subtotal)),
        };

        discount.clamp(Decimal::ZERO, subtotal)
    }
}

/// Canonical form of a coupon code: trimmed and upper-cased.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
