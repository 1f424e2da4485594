//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{error, info};

use crate::{
    database::Db,
    domain::{
        carts::{
            data::Shopper,
            records::CartRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        coupons::repository::PgCouponsRepository,
        orders::{
            data::NewOrder,
            errors::OrdersServiceError,
            finalizer::{self, CartSnapshot, ValidatedOrder},
            records::{OrderDetails, OrderItemRecord, OrderRecord, OrderUuid},
            repository::{OrderInsert, PgOrdersRepository},
        },
        products::{
            cache::CatalogCache,
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
    locale::Locale,
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    coupons_repository: PgCouponsRepository,
    cache: Arc<CatalogCache>,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, cache: Arc<CatalogCache>) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            cache,
        }
    }

    /// The shopper's existing cart. Checkout never creates or merges carts.
    async fn find_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shopper: &Shopper,
    ) -> Result<Option<CartRecord>, sqlx::Error> {
        match (shopper.user, &shopper.session) {
            (Some(user), _) => self.carts_repository.find_user_cart(tx, user).await,
            (None, Some(session)) => self.carts_repository.find_guest_cart(tx, session).await,
            (None, None) => Ok(None),
        }
    }

    async fn cart_has_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: Option<&CartRecord>,
    ) -> Result<bool, sqlx::Error> {
        let Some(cart) = cart else {
            return Ok(false);
        };

        self.items_repository
            .prune_orphaned_items(tx, cart.uuid)
            .await?;

        Ok(!self
            .items_repository
            .get_cart_items(tx, cart.uuid)
            .await?
            .is_empty())
    }

    /// Write the order, its items and every side effect, then commit.
    async fn commit_order(
        &self,
        mut tx: Transaction<'static, Postgres>,
        shopper: &Shopper,
        cart: Option<&CartRecord>,
        order: &NewOrder,
        validated: &ValidatedOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        let created = self
            .repository
            .create_order(
                &mut tx,
                &OrderInsert {
                    user: shopper.user,
                    customer: &order.customer,
                    validated,
                    payment_method: order.payment_method,
                    notes: order.notes.as_deref(),
                },
            )
            .await?;

        for (position, line) in (0_i32..).zip(&validated.lines) {
            self.repository
                .create_order_item(&mut tx, created.uuid, position, line)
                .await?;

            self.products_repository
                .increment_downloads_count(&mut tx, line.product)
                .await?;
        }

        if let Some(code) = validated.coupon_code.as_deref()
            && self.coupons_repository.increment_usage(&mut tx, code).await? == 0
        {
            return Err(sqlx::Error::RowNotFound);
        }

        if let Some(cart) = cart {
            self.items_repository
                .clear_cart_items(&mut tx, cart.uuid)
                .await?;

            self.carts_repository.set_coupon(&mut tx, cart.uuid, None).await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn attach_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderDetails>, sqlx::Error> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items: FxHashMap<OrderUuid, Vec<OrderItemRecord>> = FxHashMap::default();

        for item in self.repository.get_order_items(tx, &uuids).await? {
            items.entry(item.order_uuid).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| OrderDetails {
                items: items.remove(&order.uuid).unwrap_or_default(),
                order,
            })
            .collect())
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.place_order",
        skip(self, shopper, order),
        fields(
            user_uuid = ?shopper.user,
            has_session = shopper.session.is_some(),
            item_count = order.items.len()
        ),
        err
    )]
    async fn place_order(
        &self,
        shopper: Shopper,
        order: NewOrder,
        locale: Locale,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.find_cart(&mut tx, &shopper).await?;
        let has_items = self.cart_has_items(&mut tx, cart.as_ref()).await?;

        let cart_coupon_code = cart.as_ref().and_then(|cart| cart.coupon_code.as_deref());

        let coupon = match cart_coupon_code {
            Some(code) => self.coupons_repository.lock_by_code(&mut tx, code).await?,
            None => None,
        };

        let requested: Vec<ProductUuid> = order.items.iter().map(|item| item.product).collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .products_repository
            .find_purchasable_products(&mut tx, &requested)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let snapshot = CartSnapshot {
            has_items,
            coupon_code: cart_coupon_code,
            coupon: coupon.as_ref(),
        };

        let validated = finalizer::validate(&order, snapshot, &products, locale, Timestamp::now())
            .map_err(|rejections| {
                info!(rejections = ?rejections, "order rejected");

                OrdersServiceError::ValidationFailed(rejections)
            })?;

        let created = self
            .commit_order(tx, &shopper, cart.as_ref(), &order, &validated)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to create order");

                OrdersServiceError::CreationFailed(e)
            })?;

        for line in &validated.lines {
            let categories: Vec<_> = products
                .get(&line.product)
                .map(|product| product.category.uuid)
                .into_iter()
                .collect();

            self.cache.invalidate_product(line.product, &categories).await;
        }

        info!(
            order_uuid = %created.uuid,
            order_number = %created.order_number,
            total_amount = %created.total_amount,
            "placed order"
        );

        Ok(created)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self, user),
        fields(user_uuid = %user),
        err
    )]
    async fn list_orders(
        &self,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Page<OrderDetails>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self.repository.list_user_orders(&mut tx, user, page).await?;
        let total = self.repository.count_user_orders(&mut tx, user).await?;
        let details = self.attach_items(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(Page::new(details, page, total))
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self, user, order),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_user_order(&mut tx, user, order).await?;

        let details = self
            .attach_items(&mut tx, vec![record])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)?;

        tx.commit().await?;

        Ok(details)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Validate a checkout against the shopper's cart and live prices, then store it.
    ///
    /// On success the cart is emptied. Nothing is written when validation or storage
    /// fails.
    async fn place_order(
        &self,
        shopper: Shopper,
        order: NewOrder,
        locale: Locale,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// A user's orders, newest first.
    async fn list_orders(
        &self,
        user: UserUuid,
        page: PageRequest,
    ) -> Result<Page<OrderDetails>, OrdersServiceError>;

    /// One of the user's orders with its items.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderDetails, OrdersServiceError>;
}
