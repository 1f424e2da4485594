//! Cart pricing
//!
//! Totals are always derived here from live product prices and the attached coupon.

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{
        carts::records::{CartItemUuid, CartUuid},
        coupons::records::{CouponRecord, CouponType},
        products::view::ProductView,
    },
    money::round_money,
};

/// Subtotal, discount and total of a set of lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Price `(unit price, quantity)` lines with an optional coupon.
    #[must_use]
    pub fn compute(
        lines: impl IntoIterator<Item = (Decimal, u32)>,
        coupon: Option<&CouponRecord>,
        now: Timestamp,
    ) -> Self {
        let subtotal = round_money(
            lines
                .into_iter()
                .map(|(price, quantity)| line_total(price, quantity))
                .sum(),
        );

        let discount = coupon.map_or(Decimal::ZERO, |coupon| {
            coupon.calculate_discount(subtotal, now)
        });

        Self {
            subtotal,
            discount,
            total: round_money((subtotal - discount).max(Decimal::ZERO)),
        }
    }
}

/// `price * quantity`, rounded to cents.
#[must_use]
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    round_money(price * Decimal::from(quantity))
}

/// The parts of a coupon shown with a priced cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponSummary {
    pub code: String,
    pub kind: CouponType,
    pub value: Decimal,
}

impl From<&CouponRecord> for CouponSummary {
    fn from(coupon: &CouponRecord) -> Self {
        Self {
            code: coupon.code.clone(),
            kind: coupon.kind,
            value: coupon.value,
        }
    }
}

/// A cart line with its product resolved for the request locale.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCartItem {
    pub uuid: CartItemUuid,
    pub product: ProductView,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Cart as returned to shoppers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricedCart {
    /// `None` when the shopper has no cart yet.
    pub uuid: Option<CartUuid>,
    pub items: Vec<PricedCartItem>,
    pub coupon_code: Option<String>,
    pub coupon: Option<CouponSummary>,
    pub totals: CartTotals,
}

impl PricedCart {
    /// Price resolved lines against an optional attached coupon.
    #[must_use]
    pub fn price(
        uuid: CartUuid,
        lines: Vec<(CartItemUuid, ProductView, u32)>,
        coupon: Option<&CouponRecord>,
        now: Timestamp,
    ) -> Self {
        let totals = CartTotals::compute(
            lines
                .iter()
                .map(|(_, product, quantity)| (product.final_price, *quantity)),
            coupon,
            now,
        );

        let items = lines
            .into_iter()
            .map(|(uuid, product, quantity)| PricedCartItem {
                uuid,
                line_total: line_total(product.final_price, quantity),
                product,
                quantity,
            })
            .collect();

        Self {
            uuid: Some(uuid),
            items,
            coupon_code: coupon.map(|coupon| coupon.code.clone()),
            coupon: coupon.map(CouponSummary::from),
            totals,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
