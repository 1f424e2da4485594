//! Order Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod index;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal_macros::dec;

    use auvea_app::domain::{
        orders::{
            data::PaymentMethod,
            records::{
                OrderDetails, OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus,
                OrderUuid, PaymentStatus,
            },
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::TEST_USER_UUID;

    pub(super) fn make_order(uuid: OrderUuid) -> OrderRecord {
        OrderRecord {
            uuid,
            order_number: "ORD-20260314-AB12CD".to_string(),
            user_uuid: Some(TEST_USER_UUID),
            customer_name: "Layla Haddad".to_string(),
            customer_email: "layla@example.com".to_string(),
            customer_phone: None,
            address: None,
            city: None,
            subtotal: dec!(160.00),
            discount_amount: dec!(16.00),
            total_amount: dec!(144.00),
            coupon_code: Some("SAVE10".to_string()),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            notes: "Digital Download Order".to_string(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(super) fn make_order_details(uuid: OrderUuid) -> OrderDetails {
        OrderDetails {
            order: make_order(uuid),
            items: vec![OrderItemRecord {
                uuid: OrderItemUuid::new(),
                order_uuid: uuid,
                product_uuid: Some(ProductUuid::new()),
                product_name: "Lotus Ring".to_string(),
                price: dec!(80.00),
                quantity: 2,
                total: dec!(160.00),
                position: 0,
            }],
        }
    }
}
