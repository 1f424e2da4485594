//! Orders Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rand::{Rng, distributions::Alphanumeric};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    domain::{
        orders::{
            data::{CustomerDetails, DEFAULT_ORDER_NOTES, PaymentMethod},
            finalizer::{OrderLine, ValidatedOrder},
            records::{
                OrderItemRecord, OrderItemUuid, OrderRecord, OrderStatus, OrderUuid, PaymentStatus,
            },
        },
        products::records::ProductUuid,
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("sql/list_user_orders.sql");
const COUNT_USER_ORDERS_SQL: &str = include_str!("sql/count_user_orders.sql");
const GET_USER_ORDER_SQL: &str = include_str!("sql/get_user_order.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("sql/get_order_items.sql");

/// Everything needed to insert an order row.
#[derive(Debug)]
pub(crate) struct OrderInsert<'a> {
    pub user: Option<UserUuid>,
    pub customer: &'a CustomerDetails,
    pub validated: &'a ValidatedOrder,
    pub payment_method: PaymentMethod,
    pub notes: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderInsert<'_>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let notes = order
            .notes
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .unwrap_or(DEFAULT_ORDER_NOTES);

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(Uuid::now_v7())
            .bind(generate_order_number(Timestamp::now()))
            .bind(order.user.map(UserUuid::into_uuid))
            .bind(order.customer.name.trim())
            .bind(order.customer.email.trim())
            .bind(order.customer.phone.as_deref())
            .bind(order.customer.address.as_deref())
            .bind(order.customer.city.as_deref())
            .bind(order.validated.totals.subtotal)
            .bind(order.validated.totals.discount)
            .bind(order.validated.totals.total)
            .bind(order.validated.coupon_code.as_deref())
            .bind(order.payment_method.as_str())
            .bind(notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        position: i32,
        line: &OrderLine,
    ) -> Result<OrderItemRecord, sqlx::Error> {
        let quantity =
            i32::try_from(line.quantity).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, OrderItemRecord>(CREATE_ORDER_ITEM_SQL)
            .bind(Uuid::now_v7())
            .bind(order.into_uuid())
            .bind(line.product.into_uuid())
            .bind(&line.product_name)
            .bind(line.price)
            .bind(quantity)
            .bind(line.total)
            .bind(position)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn get_user_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_USER_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Items of every order in `orders`, grouped by order and in position order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, OrderItemRecord>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

/// `ORD-YYYYMMDD-XXXXXX` with a random upper-case alphanumeric suffix.
fn generate_order_number(now: Timestamp) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("ORD-{}-{}", now.strftime("%Y%m%d"), suffix.to_uppercase())
}

fn decode_column<T, E>(column: &str, value: Result<T, E>) -> sqlx::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    value.map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;
        let payment_method: String = row.try_get("payment_method")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            customer_phone: row.try_get("customer_phone")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            subtotal: row.try_get("subtotal")?,
            discount_amount: row.try_get("discount_amount")?,
            total_amount: row.try_get("total_amount")?,
            coupon_code: row.try_get("coupon_code")?,
            status: decode_column("status", status.parse::<OrderStatus>())?,
            payment_status: decode_column(
                "payment_status",
                payment_status.parse::<PaymentStatus>(),
            )?,
            payment_method: decode_column(
                "payment_method",
                payment_method.parse::<PaymentMethod>(),
            )?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity: i32 = row.try_get("quantity")?;

        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: row
                .try_get::<Option<Uuid>, _>("product_uuid")?
                .map(ProductUuid::from_uuid),
            product_name: row.try_get("product_name")?,
            price: row.try_get("price")?,
            quantity: decode_column("quantity", u32::try_from(quantity))?,
            total: row.try_get("total")?,
            position: row.try_get("position")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_numbers_carry_the_date_and_a_random_suffix() -> Result<(), jiff::Error> {
        let now: Timestamp = "2026-03-14T10:00:00Z".parse()?;

        let first = generate_order_number(now);
        let second = generate_order_number(now);

        assert!(first.starts_with("ORD-20260314-"), "{first}");
        assert_eq!(first.len(), "ORD-20260314-".len() + 6);
        assert!(
            first[13..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
        assert_ne!(first, second);

        Ok(())
    }
}
