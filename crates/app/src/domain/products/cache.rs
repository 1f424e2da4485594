//! Catalog read cache
//!
//! Entries are keyed by product and locale, or by the full listing query. Invalidation is
//! scoped to the product that changed and the listings that could contain it.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::{
    domain::products::{
        data::CatalogQuery,
        records::{CategoryUuid, ProductUuid},
        view::ProductView,
    },
    locale::Locale,
    pagination::Page,
};

/// Default time-to-live for cached catalog reads.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct Cached<T> {
    value: T,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    products: RwLock<FxHashMap<(ProductUuid, Locale), Cached<ProductView>>>,
    listings: RwLock<FxHashMap<CatalogQuery, Cached<Page<ProductView>>>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_TTL)
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            products: RwLock::default(),
            listings: RwLock::default(),
        }
    }

    pub async fn product(&self, product: ProductUuid, locale: Locale) -> Option<ProductView> {
        self.products
            .read()
            .await
            .get(&(product, locale))
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn store_product(&self, locale: Locale, view: ProductView) {
        let mut products = self.products.write().await;

        products.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        products.insert(
            (view.uuid, locale),
            Cached {
                value: view,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn listing(&self, query: &CatalogQuery) -> Option<Page<ProductView>> {
        self.listings
            .read()
            .await
            .get(query)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn store_listing(&self, query: CatalogQuery, page: Page<ProductView>) {
        let mut listings = self.listings.write().await;

        listings.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        listings.insert(
            query,
            Cached {
                value: page,
                stored_at: Instant::now(),
            },
        );
    }

    /// Evict a product's entries in every locale, along with every listing that is not
    /// filtered to some other category.
    pub async fn invalidate_product(&self, product: ProductUuid, categories: &[CategoryUuid]) {
        self.products
            .write()
            .await
            .retain(|(cached, _), _| *cached != product);

        self.listings.write().await.retain(|query, _| {
            query
                .category
                .is_some_and(|category| !categories.contains(&category))
        });

        tracing::debug!(product_uuid = %product, "invalidated catalog cache entries");
    }
}
