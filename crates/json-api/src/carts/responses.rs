//! Cart Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auvea_app::domain::pricing::{CouponSummary, PricedCart, PricedCartItem};

use crate::products::responses::CategoryResponse;

/// Attached coupon summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    pub code: String,

    /// `percent` or `fixed`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub value: Decimal,
}

impl From<CouponSummary> for CouponResponse {
    fn from(coupon: CouponSummary) -> Self {
        Self {
            code: coupon.code,
            kind: coupon.kind.as_str().to_string(),
            value: coupon.value,
        }
    }
}

/// A cart line: the product in the request locale plus the line's quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// Product identifier
    pub id: Uuid,

    pub cart_item_id: Uuid,

    pub category_id: Uuid,

    pub category: CategoryResponse,

    pub name: String,

    pub description: String,

    pub sku: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[salvo(schema(value_type = Option<f64>))]
    pub discount_price: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub final_price: Decimal,

    pub quantity: u32,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub line_total: Decimal,

    pub images: Vec<String>,

    pub preview_images: Vec<String>,
}

impl From<PricedCartItem> for CartItemResponse {
    fn from(item: PricedCartItem) -> Self {
        let product = item.product;

        Self {
            id: product.uuid.into_uuid(),
            cart_item_id: item.uuid.into_uuid(),
            category_id: product.category.uuid.into_uuid(),
            category: product.category.into(),
            name: product.name,
            description: product.description,
            sku: product.sku,
            price: product.price,
            discount_price: product.discount_price,
            final_price: product.final_price,
            quantity: item.quantity,
            line_total: item.line_total,
            images: product.images,
            preview_images: product.preview_images,
        }
    }
}

/// Cart Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub success: bool,

    pub items: Vec<CartItemResponse>,

    /// Code of the attached coupon, if any
    pub coupon_code: Option<String>,

    pub coupon: Option<CouponResponse>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub subtotal: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub discount_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total: Decimal,
}

impl From<PricedCart> for CartResponse {
    fn from(cart: PricedCart) -> Self {
        Self {
            success: true,
            items: cart.items.into_iter().map(Into::into).collect(),
            coupon_code: cart.coupon_code,
            coupon: cart.coupon.map(Into::into),
            subtotal: cart.totals.subtotal,
            discount_amount: cart.totals.discount,
            total: cart.totals.total,
        }
    }
}
