//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::{
        data::SessionToken,
        records::{CartRecord, CartUuid},
    },
    users::records::UserUuid,
};

const GET_OR_CREATE_USER_CART_SQL: &str = include_str!("../sql/get_or_create_user_cart.sql");
const GET_OR_CREATE_GUEST_CART_SQL: &str = include_str!("../sql/get_or_create_guest_cart.sql");
const FIND_USER_CART_SQL: &str = include_str!("../sql/find_user_cart.sql");
const FIND_GUEST_CART_SQL: &str = include_str!("../sql/find_guest_cart.sql");
const SET_CART_COUPON_SQL: &str = include_str!("../sql/set_cart_coupon.sql");
const DELETE_CART_SQL: &str = include_str!("../sql/delete_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_or_create_user_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_OR_CREATE_USER_CART_SQL)
            .bind(Uuid::now_v7())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_or_create_guest_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &SessionToken,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(GET_OR_CREATE_GUEST_CART_SQL)
            .bind(Uuid::now_v7())
            .bind(session.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_user_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_USER_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Guest-only cart for a session, ignoring carts already claimed by a user.
    pub(crate) async fn find_guest_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session: &SessionToken,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        query_as::<Postgres, CartRecord>(FIND_GUEST_CART_SQL)
            .bind(session.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn set_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        coupon_code: Option<&str>,
    ) -> Result<CartRecord, sqlx::Error> {
        query_as::<Postgres, CartRecord>(SET_CART_COUPON_SQL)
            .bind(cart.into_uuid())
            .bind(coupon_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            session_id: row.try_get("session_id")?,
            coupon_code: row.try_get("coupon_code")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
