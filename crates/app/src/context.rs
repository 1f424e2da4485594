//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, DEFAULT_MAX_ITEM_QUANTITY, PgCartsService},
        coupons::{CouponsService, PgCouponsService},
        orders::{OrdersService, PgOrdersService},
        products::{
            CatalogCache, PgProductsService, ProductsService, cache::DEFAULT_CATALOG_TTL,
            view::MediaUrls,
        },
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Storefront tunables shared by the services.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Prefix for relative product media paths.
    pub asset_base_url: String,
    pub max_item_quantity: u32,
    pub catalog_ttl: Duration,
    pub max_connections: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            asset_base_url: String::new(),
            max_item_quantity: DEFAULT_MAX_ITEM_QUANTITY,
            catalog_ttl: DEFAULT_CATALOG_TTL,
            max_connections: database::DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
    pub products: Arc<dyn ProductsService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, settings: AppSettings) -> Result<Self, AppInitError> {
        let pool = database::connect_with(url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());
        let cache = Arc::new(CatalogCache::new(settings.catalog_ttl));
        let media = MediaUrls::new(settings.asset_base_url);

        Ok(Self {
            carts: Arc::new(PgCartsService::new(
                db.clone(),
                media.clone(),
                settings.max_item_quantity,
            )),
            coupons: Arc::new(PgCouponsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), Arc::clone(&cache))),
            products: Arc::new(PgProductsService::new(db.clone(), cache, media)),
            users: Arc::new(PgUsersService::new(db)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
