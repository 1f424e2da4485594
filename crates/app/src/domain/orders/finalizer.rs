//! Checkout validation
//!
//! Turns a submitted order into lines priced from live product data, or into the list
//! of reasons it cannot be placed. Nothing here touches the database.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    domain::{
        coupons::{normalize_code, records::CouponRecord},
        orders::data::NewOrder,
        pricing::{CartTotals, line_total},
        products::records::{ProductRecord, ProductUuid},
    },
    locale::Locale,
    money::amounts_match,
};

/// Why an order was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderRejection {
    #[error("cart is empty")]
    CartEmpty,

    #[error("item {index} references a missing or inactive product")]
    ProductUnavailable { index: usize, product: ProductUuid },

    #[error("claimed total {claimed} does not match {expected}")]
    TotalMismatch { expected: Decimal, claimed: Decimal },
}

pub type OrderRejections = SmallVec<[OrderRejection; 4]>;

/// A line ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product: ProductUuid,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub total: Decimal,
}

/// An order that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub lines: Vec<OrderLine>,
    pub totals: CartTotals,
    /// Set only when the coupon actually contributed to the totals.
    pub coupon_code: Option<String>,
}

/// What checkout knows about the shopper's cart.
#[derive(Debug, Clone, Copy)]
pub struct CartSnapshot<'a> {
    pub has_items: bool,
    pub coupon_code: Option<&'a str>,
    /// The cart's attached coupon, when it still exists.
    pub coupon: Option<&'a CouponRecord>,
}

/// Validate `order` against live `products`.
///
/// A coupon counts only when the submitted code matches the cart's attached, still
/// valid coupon.
///
/// # Errors
///
/// Returns every reason the order cannot be placed. An empty cart is reported alone.
pub fn validate(
    order: &NewOrder,
    cart: CartSnapshot<'_>,
    products: &FxHashMap<ProductUuid, ProductRecord>,
    locale: Locale,
    now: Timestamp,
) -> Result<ValidatedOrder, OrderRejections> {
    if !cart.has_items || order.items.is_empty() {
        return Err(smallvec![OrderRejection::CartEmpty]);
    }

    let mut rejections = OrderRejections::new();
    let mut lines = Vec::with_capacity(order.items.len());

    for (index, item) in order.items.iter().enumerate() {
        match products.get(&item.product).filter(|p| p.is_purchasable()) {
            Some(product) => {
                let price = product.final_price();

                lines.push(OrderLine {
                    product: product.uuid,
                    product_name: product.name.resolve(locale).to_string(),
                    price,
                    quantity: item.quantity,
                    total: line_total(price, item.quantity),
                });
            }
            None => rejections.push(OrderRejection::ProductUnavailable {
                index,
                product: item.product,
            }),
        }
    }

    if !rejections.is_empty() {
        return Err(rejections);
    }

    let coupon = applicable_coupon(order, cart, now);

    let totals = CartTotals::compute(
        lines.iter().map(|line| (line.price, line.quantity)),
        coupon,
        now,
    );

    if !amounts_match(totals.total, order.total) {
        rejections.push(OrderRejection::TotalMismatch {
            expected: totals.total,
            claimed: order.total,
        });

        return Err(rejections);
    }

    Ok(ValidatedOrder {
        lines,
        coupon_code: coupon
            .filter(|_| totals.discount > Decimal::ZERO)
            .map(|coupon| coupon.code.clone()),
        totals,
    })
}

fn applicable_coupon<'a>(
    order: &NewOrder,
    cart: CartSnapshot<'a>,
    now: Timestamp,
) -> Option<&'a CouponRecord> {
    let requested = order.coupon_code.as_deref().map(normalize_code)?;

    if requested.is_empty() || cart.coupon_code != Some(requested.as_str()) {
        return None;
    }

    cart.coupon.filter(|coupon| coupon.is_valid(now))
}
