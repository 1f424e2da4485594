//! Order Responses

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auvea_app::domain::orders::records::{OrderDetails, OrderItemRecord, OrderRecord};

/// Summary of a freshly placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub id: Uuid,

    pub order_number: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total_amount: Decimal,

    pub status: String,

    pub created_at: String,
}

/// Order Created Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderCreatedResponse {
    pub success: bool,

    pub message: String,

    pub order_id: Uuid,

    pub order_number: String,

    pub data: OrderSummaryResponse,
}

impl From<OrderRecord> for OrderCreatedResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            success: true,
            message: "order_created_successfully".to_string(),
            order_id: order.uuid.into_uuid(),
            order_number: order.order_number.clone(),
            data: OrderSummaryResponse {
                id: order.uuid.into_uuid(),
                order_number: order.order_number,
                total_amount: order.total_amount,
                status: order.status.as_str().to_string(),
                created_at: order.created_at.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub id: Uuid,

    /// Missing once the product has been removed from the catalog
    pub product_id: Option<Uuid>,

    /// Name at the time of purchase
    pub product_name: String,

    /// Unit price charged
    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub price: Decimal,

    pub quantity: u32,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total: Decimal,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            id: item.uuid.into_uuid(),
            product_id: item.product_uuid.map(Into::into),
            product_name: item.product_name,
            price: item.price,
            quantity: item.quantity,
            total: item.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub id: Uuid,

    pub order_number: String,

    pub customer_name: String,

    pub customer_email: String,

    pub customer_phone: Option<String>,

    pub address: Option<String>,

    pub city: Option<String>,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub subtotal: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub discount_amount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    #[salvo(schema(value_type = f64))]
    pub total_amount: Decimal,

    pub coupon_code: Option<String>,

    pub status: String,

    pub payment_status: String,

    pub payment_method: String,

    pub notes: String,

    pub items: Vec<OrderItemResponse>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let order = details.order;

        Self {
            id: order.uuid.into_uuid(),
            order_number: order.order_number,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            customer_phone: order.customer_phone,
            address: order.address,
            city: order.city,
            subtotal: order.subtotal,
            discount_amount: order.discount_amount,
            total_amount: order.total_amount,
            coupon_code: order.coupon_code,
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            payment_method: order.payment_method.as_str().to_string(),
            notes: order.notes,
            items: details.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}
