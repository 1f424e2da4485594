//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};
use uuid::Uuid;

use crate::{
    domain::products::{
        data::{CatalogQuery, NewCategory, NewProduct, ProductUpdate},
        records::{CategoryRecord, CategoryUuid, ProductRecord, ProductUuid},
    },
    locale::Translations,
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_CATALOG_PRODUCT_SQL: &str = include_str!("sql/get_catalog_product.sql");
const FIND_PRODUCTS_SQL: &str = include_str!("sql/find_products.sql");
const FIND_PURCHASABLE_PRODUCTS_SQL: &str = include_str!("sql/find_purchasable_products.sql");
const LIST_CATALOG_PRODUCTS_SQL: &str = include_str!("sql/list_catalog_products.sql");
const COUNT_CATALOG_PRODUCTS_SQL: &str = include_str!("sql/count_catalog_products.sql");
const CREATE_CATEGORY_SQL: &str = include_str!("sql/create_category.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const CREATE_PRODUCT_MEDIA_SQL: &str = include_str!("sql/create_product_media.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const INCREMENT_VIEWS_COUNT_SQL: &str = include_str!("sql/increment_views_count.sql");
const INCREMENT_DOWNLOADS_COUNT_SQL: &str = include_str!("sql/increment_downloads_count.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_catalog_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_CATALOG_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Non-deleted products among `products`, active or not.
    pub(crate) async fn find_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(FIND_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    /// Active, non-deleted products among `products`. Missing ids are simply absent.
    pub(crate) async fn find_purchasable_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|uuid| uuid.into_uuid()).collect();

        query_as::<Postgres, ProductRecord>(FIND_PURCHASABLE_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_catalog_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        catalog: &CatalogQuery,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_CATALOG_PRODUCTS_SQL)
            .bind(catalog.category.map(CategoryUuid::into_uuid))
            .bind(catalog.featured)
            .bind(catalog.page.limit())
            .bind(catalog.page.offset())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_catalog_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        catalog: &CatalogQuery,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_CATALOG_PRODUCTS_SQL)
            .bind(catalog.category.map(CategoryUuid::into_uuid))
            .bind(catalog.featured)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn create_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: &NewCategory,
    ) -> Result<CategoryRecord, sqlx::Error> {
        let row = query(CREATE_CATEGORY_SQL)
            .bind(category.uuid.into_uuid())
            .bind(Json(&category.name))
            .bind(category.slug.trim())
            .bind(category.is_active)
            .fetch_one(&mut **tx)
            .await?;

        Ok(CategoryRecord {
            uuid: CategoryUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get::<Json<Translations>, _>("name")?.0,
            slug: row.try_get("slug")?,
            is_active: row.try_get("is_active")?,
        })
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.category.into_uuid())
            .bind(Json(&product.name))
            .bind(Json(&product.description))
            .bind(product.sku.trim())
            .bind(product.price)
            .bind(product.discount_price)
            .bind(product.is_featured)
            .bind(product.is_active)
            .execute(&mut **tx)
            .await?;

        let media = product
            .images
            .iter()
            .map(|path| ("images", path))
            .chain(
                product
                    .preview_images
                    .iter()
                    .map(|path| ("preview_images", path)),
            );

        for (position, (collection, path)) in (0_i32..).zip(media) {
            query(CREATE_PRODUCT_MEDIA_SQL)
                .bind(Uuid::now_v7())
                .bind(product.uuid.into_uuid())
                .bind(collection)
                .bind(path)
                .bind(position)
                .execute(&mut **tx)
                .await?;
        }

        self.get_product(tx, product.uuid).await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: &ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let rows_affected = query(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.category.into_uuid())
            .bind(Json(&update.name))
            .bind(Json(&update.description))
            .bind(update.price)
            .bind(update.discount_price)
            .bind(update.is_featured)
            .bind(update.is_active)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        self.get_product(tx, product).await
    }

    /// Soft-delete a product, returning the category it belonged to.
    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<CategoryUuid>, sqlx::Error> {
        let category: Option<Uuid> = query_scalar(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(category.map(CategoryUuid::from_uuid))
    }

    pub(crate) async fn increment_views_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<i32>, sqlx::Error> {
        query_scalar(INCREMENT_VIEWS_COUNT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn increment_downloads_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(INCREMENT_DOWNLOADS_COUNT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            category: CategoryRecord {
                uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
                name: row.try_get::<Json<Translations>, _>("category_name")?.0,
                slug: row.try_get("category_slug")?,
                is_active: row.try_get("category_is_active")?,
            },
            name: row.try_get::<Json<Translations>, _>("name")?.0,
            description: row.try_get::<Json<Translations>, _>("description")?.0,
            sku: row.try_get("sku")?,
            price: row.try_get("price")?,
            discount_price: row.try_get("discount_price")?,
            file_format: row.try_get("file_format")?,
            file_size: row.try_get("file_size")?,
            is_featured: row.try_get("is_featured")?,
            is_active: row.try_get("is_active")?,
            downloads_count: row.try_get("downloads_count")?,
            views_count: row.try_get("views_count")?,
            images: row.try_get("images")?,
            preview_images: row.try_get("preview_images")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
