//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::{NewCartItem, SessionToken, Shopper},
            errors::CartsServiceError,
            records::CartRecord,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        coupons::{records::CouponRecord, normalize_code, repository::PgCouponsRepository},
        pricing::PricedCart,
        products::{
            records::{ProductRecord, ProductUuid},
            repository::PgProductsRepository,
            view::{MediaUrls, ProductView},
        },
    },
    locale::Locale,
};

/// Default cap on a single cart line's quantity.
pub const DEFAULT_MAX_ITEM_QUANTITY: u32 = 100;

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    coupons_repository: PgCouponsRepository,
    media: MediaUrls,
    max_item_quantity: u32,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, media: MediaUrls, max_item_quantity: u32) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            coupons_repository: PgCouponsRepository::new(),
            media,
            max_item_quantity: max_item_quantity.max(1),
        }
    }

    /// Get or create the shopper's cart, folding in their guest cart when they are
    /// signed in and still carry a session token.
    async fn resolve_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        shopper: &Shopper,
    ) -> Result<CartRecord, CartsServiceError> {
        match (shopper.user, &shopper.session) {
            (Some(user), session) => {
                let cart = self
                    .carts_repository
                    .get_or_create_user_cart(tx, user)
                    .await?;

                match session {
                    Some(session) => self.merge_guest_cart(tx, cart, session).await,
                    None => Ok(cart),
                }
            }
            (None, Some(session)) => Ok(self
                .carts_repository
                .get_or_create_guest_cart(tx, session)
                .await?),
            (None, None) => Err(CartsServiceError::MissingSessionIdentity),
        }
    }

    async fn merge_guest_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartRecord,
        session: &SessionToken,
    ) -> Result<CartRecord, CartsServiceError> {
        let Some(guest) = self.carts_repository.find_guest_cart(tx, session).await? else {
            return Ok(cart);
        };

        let moved = self
            .items_repository
            .merge_cart_items(tx, guest.uuid, cart.uuid, self.max_item_quantity)
            .await?;

        let cart = match (&cart.coupon_code, guest.coupon_code.as_deref()) {
            (None, Some(code)) => {
                self.carts_repository
                    .set_coupon(tx, cart.uuid, Some(code))
                    .await?
            }
            _ => cart,
        };

        self.carts_repository.delete_cart(tx, guest.uuid).await?;

        info!(
            cart_uuid = %cart.uuid,
            guest_cart_uuid = %guest.uuid,
            moved_items = moved,
            "merged guest cart"
        );

        Ok(cart)
    }

    /// The cart's coupon if it is still valid. An invalid or missing coupon is detached.
    async fn attached_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &CartRecord,
        now: Timestamp,
    ) -> Result<Option<CouponRecord>, CartsServiceError> {
        let Some(code) = cart.coupon_code.as_deref() else {
            return Ok(None);
        };

        match self.coupons_repository.find_by_code(tx, code).await? {
            Some(coupon) if coupon.is_valid(now) => Ok(Some(coupon)),
            _ => {
                self.carts_repository.set_coupon(tx, cart.uuid, None).await?;

                info!(cart_uuid = %cart.uuid, coupon_code = code, "detached invalid coupon");

                Ok(None)
            }
        }
    }

    async fn price_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &CartRecord,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        let pruned = self.items_repository.prune_orphaned_items(tx, cart.uuid).await?;

        if pruned > 0 {
            debug!(cart_uuid = %cart.uuid, pruned, "pruned orphaned cart items");
        }

        let items = self.items_repository.get_cart_items(tx, cart.uuid).await?;

        let product_uuids: Vec<ProductUuid> =
            items.iter().map(|item| item.product_uuid).collect();

        let products: FxHashMap<ProductUuid, ProductRecord> = self
            .products_repository
            .find_products(tx, &product_uuids)
            .await?
            .into_iter()
            .map(|product| (product.uuid, product))
            .collect();

        let lines = items
            .into_iter()
            .filter_map(|item| {
                products.get(&item.product_uuid).map(|product| {
                    (
                        item.uuid,
                        ProductView::localize(product, locale, &self.media),
                        item.quantity,
                    )
                })
            })
            .collect();

        let now = Timestamp::now();
        let coupon = self.attached_coupon(tx, cart, now).await?;

        Ok(PricedCart::price(cart.uuid, lines, coupon.as_ref(), now))
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self, shopper),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn get_cart(
        &self,
        shopper: Shopper,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        if shopper.is_anonymous() {
            return Ok(PricedCart::default());
        }

        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;
        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, shopper),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn add_item(
        &self,
        shopper: Shopper,
        item: NewCartItem,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;

        let available = self
            .products_repository
            .find_purchasable_products(&mut tx, &[item.product])
            .await?;

        if available.is_empty() {
            return Err(CartsServiceError::ProductUnavailable);
        }

        self.items_repository
            .upsert_cart_item(
                &mut tx,
                cart.uuid,
                item.product,
                item.clamped_quantity(self.max_item_quantity),
                self.max_item_quantity,
            )
            .await?;

        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.update_item_quantity",
        skip(self, shopper),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn update_item_quantity(
        &self,
        shopper: Shopper,
        item: Uuid,
        quantity: i64,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        if quantity < 1 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let quantity = u32::try_from(quantity)
            .unwrap_or(u32::MAX)
            .min(self.max_item_quantity);

        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;

        let line = self
            .items_repository
            .find_cart_item(&mut tx, cart.uuid, item)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        self.items_repository
            .update_quantity(&mut tx, line.uuid, quantity)
            .await?;

        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip(self, shopper),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn remove_item(
        &self,
        shopper: Shopper,
        item: Uuid,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;

        let line = self
            .items_repository
            .find_cart_item(&mut tx, cart.uuid, item)
            .await?
            .ok_or(CartsServiceError::ItemNotFound)?;

        self.items_repository
            .delete_cart_item(&mut tx, line.uuid)
            .await?;

        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.clear_cart",
        skip(self, shopper),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn clear_cart(
        &self,
        shopper: Shopper,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;

        self.items_repository
            .clear_cart_items(&mut tx, cart.uuid)
            .await?;

        let cart = self.carts_repository.set_coupon(&mut tx, cart.uuid, None).await?;
        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.apply_coupon",
        skip(self, shopper, code),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn apply_coupon(
        &self,
        shopper: Shopper,
        code: String,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        let code = normalize_code(&code);

        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;

        let coupon = self
            .coupons_repository
            .find_by_code(&mut tx, &code)
            .await?
            .filter(|coupon| coupon.is_valid(Timestamp::now()))
            .ok_or(CartsServiceError::InvalidCoupon)?;

        self.items_repository
            .prune_orphaned_items(&mut tx, cart.uuid)
            .await?;

        if self
            .items_repository
            .get_cart_items(&mut tx, cart.uuid)
            .await?
            .is_empty()
        {
            return Err(CartsServiceError::CartEmpty);
        }

        let cart = self
            .carts_repository
            .set_coupon(&mut tx, cart.uuid, Some(&coupon.code))
            .await?;

        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        info!(cart_uuid = %cart.uuid, coupon_code = %coupon.code, "applied coupon");

        Ok(priced)
    }

    #[tracing::instrument(
        name = "carts.service.remove_coupon",
        skip(self, shopper),
        fields(user_uuid = ?shopper.user, has_session = shopper.session.is_some()),
        err
    )]
    async fn remove_coupon(
        &self,
        shopper: Shopper,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cart = self.resolve_cart(&mut tx, &shopper).await?;
        let cart = self.carts_repository.set_coupon(&mut tx, cart.uuid, None).await?;
        let priced = self.price_cart(&mut tx, &cart, locale).await?;

        tx.commit().await?;

        Ok(priced)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Price the shopper's cart. A shopper with no identity gets an empty cart.
    async fn get_cart(
        &self,
        shopper: Shopper,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Add a product, or increase the quantity of its existing line.
    async fn add_item(
        &self,
        shopper: Shopper,
        item: NewCartItem,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Set a line's quantity. `item` is a product UUID or a cart item UUID.
    async fn update_item_quantity(
        &self,
        shopper: Shopper,
        item: Uuid,
        quantity: i64,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Remove a line. `item` is a product UUID or a cart item UUID.
    async fn remove_item(
        &self,
        shopper: Shopper,
        item: Uuid,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Remove every line and the coupon.
    async fn clear_cart(
        &self,
        shopper: Shopper,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Attach a valid coupon to a non-empty cart.
    async fn apply_coupon(
        &self,
        shopper: Shopper,
        code: String,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Detach the cart's coupon.
    async fn remove_coupon(
        &self,
        shopper: Shopper,
        locale: Locale,
    ) -> Result<PricedCart, CartsServiceError>;
}
