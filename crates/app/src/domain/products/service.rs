//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        cache::CatalogCache,
        data::{CatalogQuery, NewCategory, NewProduct, ProductUpdate},
        errors::ProductsServiceError,
        records::{CategoryRecord, ProductRecord, ProductUuid},
        repository::PgProductsRepository,
        view::{MediaUrls, ProductView},
    },
    locale::Locale,
    pagination::Page,
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
    cache: Arc<CatalogCache>,
    media: MediaUrls,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db, cache: Arc<CatalogCache>, media: MediaUrls) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
            cache,
            media,
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(
        &self,
        catalog: CatalogQuery,
    ) -> Result<Page<ProductView>, ProductsServiceError> {
        if let Some(page) = self.cache.listing(&catalog).await {
            return Ok(page);
        }

        let mut tx = self.db.begin_transaction().await?;

        let records = self
            .repository
            .list_catalog_products(&mut tx, &catalog)
            .await?;

        let total = self
            .repository
            .count_catalog_products(&mut tx, &catalog)
            .await?;

        tx.commit().await?;

        let views = records
            .iter()
            .map(|record| ProductView::localize(record, catalog.locale, &self.media))
            .collect();

        let page = Page::new(views, catalog.page, total);

        self.cache.store_listing(catalog, page.clone()).await;

        Ok(page)
    }

    async fn get_product(
        &self,
        product: ProductUuid,
        locale: Locale,
    ) -> Result<ProductView, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let views_count = self
            .repository
            .increment_views_count(&mut tx, product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        let mut view = match self.cache.product(product, locale).await {
            Some(view) => view,
            None => {
                let record = self.repository.get_catalog_product(&mut tx, product).await?;
                let view = ProductView::localize(&record, locale, &self.media);

                self.cache.store_product(locale, view.clone()).await;

                view
            }
        };

        tx.commit().await?;

        view.views_count = views_count;

        Ok(view)
    }

    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, ProductsServiceError> {
        if category.slug.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_category(&mut tx, &category).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        if product.sku.trim().is_empty() {
            return Err(ProductsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, &product).await?;

        tx.commit().await?;

        self.cache
            .invalidate_product(created.uuid, &[created.category.uuid])
            .await;

        Ok(created)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let previous = self.repository.get_product(&mut tx, product).await?;

        let updated = self
            .repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        self.cache
            .invalidate_product(product, &[previous.category.uuid, updated.category.uuid])
            .await;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let category = self
            .repository
            .delete_product(&mut tx, product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        tx.commit().await?;

        self.cache.invalidate_product(product, &[category]).await;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Lists active catalog products for a locale, optionally filtered by category or
    /// featured flag.
    async fn list_products(
        &self,
        catalog: CatalogQuery,
    ) -> Result<Page<ProductView>, ProductsServiceError>;

    /// Retrieve a single catalog product, counting the view.
    async fn get_product(
        &self,
        product: ProductUuid,
        locale: Locale,
    ) -> Result<ProductView, ProductsServiceError>;

    /// Creates a product category.
    async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<CategoryRecord, ProductsServiceError>;

    /// Creates a new product with its media.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Updates a product's catalog fields.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        domain::products::records::CategoryUuid, locale::Translations, pagination::PageRequest,
        test::TestContext,
    };

    use super::*;

    fn catalog(category: Option<CategoryUuid>) -> CatalogQuery {
        CatalogQuery {
            locale: Locale::En,
            category,
            featured: None,
            page: PageRequest::new(None, None, 12),
        }
    }

    fn update_of(record: &ProductRecord) -> ProductUpdate {
        ProductUpdate {
            category: record.category.uuid,
            name: record.name.clone(),
            description: record.description.clone(),
            price: record.price,
            discount_price: record.discount_price,
            is_featured: record.is_featured,
            is_active: record.is_active,
        }
    }

    #[tokio::test]
    async fn create_product_stores_media_in_order() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("rings").await;

        let created = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                category,
                name: Translations::new().with(Locale::En, "Lotus Ring"),
                description: Translations::new(),
                sku: "LOTUS-1".to_string(),
                price: dec!(40.00),
                discount_price: Some(dec!(30.00)),
                is_featured: false,
                is_active: true,
                images: vec!["a.png".to_string(), "b.png".to_string()],
                preview_images: vec!["c.png".to_string()],
            })
            .await?;

        assert_eq!(created.images, vec!["a.png", "b.png"]);
        assert_eq!(created.preview_images, vec!["c.png"]);
        assert_eq!(created.final_price(), dec!(30.00));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_sku_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let category = ctx.create_category("rings").await;
        let existing = ctx.create_product(category, dec!(10.00), None).await;

        let result = ctx
            .products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                category,
                name: Translations::new().with(Locale::En, "Copy"),
                description: Translations::new(),
                sku: existing.sku.clone(),
                price: dec!(10.00),
                discount_price: None,
                is_featured: false,
                is_active: true,
                images: vec![],
                preview_images: vec![],
            })
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_filters_by_category_and_hides_inactive() -> TestResult {
        let ctx = TestContext::new().await;
        let rings = ctx.create_category("rings").await;
        let pendants = ctx.create_category("pendants").await;

        let ring = ctx.create_product(rings, dec!(10.00), None).await;
        ctx.create_product(pendants, dec!(20.00), None).await;

        let hidden = ctx.create_product(rings, dec!(30.00), None).await;
        let mut update = update_of(&hidden);
        update.is_active = false;
        ctx.products.update_product(hidden.uuid, update).await?;

        let page = ctx.products.list_products(catalog(Some(rings))).await?;

        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].uuid, ring.uuid);

        let all = ctx.products.list_products(catalog(None)).await?;

        assert_eq!(all.total, 2);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_is_visible_in_cached_listing() -> TestResult {
        let ctx = TestContext::new().await;
        let rings = ctx.create_category("rings").await;
        let ring = ctx.create_product(rings, dec!(10.00), None).await;

        let before = ctx.products.list_products(catalog(None)).await?;
        assert_eq!(before.items[0].final_price, dec!(10.00));

        let mut update = update_of(&ring);
        update.discount_price = Some(dec!(7.50));
        ctx.products.update_product(ring.uuid, update).await?;

        let after = ctx.products.list_products(catalog(None)).await?;
        assert_eq!(after.items[0].final_price, dec!(7.50));

        Ok(())
    }

    #[tokio::test]
    async fn get_product_counts_views_even_when_cached() -> TestResult {
        let ctx = TestContext::new().await;
        let rings = ctx.create_category("rings").await;
        let ring = ctx.create_product(rings, dec!(10.00), None).await;

        let first = ctx.products.get_product(ring.uuid, Locale::En).await?;
        let second = ctx.products.get_product(ring.uuid, Locale::En).await?;

        assert_eq!(first.views_count, 1);
        assert_eq!(second.views_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let rings = ctx.create_category("rings").await;
        let ring = ctx.create_product(rings, dec!(10.00), None).await;

        ctx.products.get_product(ring.uuid, Locale::En).await?;
        ctx.products.delete_product(ring.uuid).await?;

        let result = ctx.products.get_product(ring.uuid, Locale::En).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let again = ctx.products.delete_product(ring.uuid).await;

        assert!(
            matches!(again, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );

        Ok(())
    }
}
