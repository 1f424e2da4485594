//! Test context for service-level integration tests.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    auth::PgAuthService,
    database::Db,
    domain::{
        carts::{DEFAULT_MAX_ITEM_QUANTITY, PgCartsService},
        coupons::{
            CouponsService, PgCouponsService,
            data::NewCoupon,
            records::{CouponRecord, CouponType, CouponUuid},
        },
        orders::PgOrdersService,
        products::{
            CatalogCache, PgProductsService, ProductsService,
            data::{NewCategory, NewProduct},
            records::{CategoryUuid, ProductRecord, ProductUuid},
            view::MediaUrls,
        },
        users::{PgUsersService, UsersService, data::NewUser, records::UserUuid},
    },
    locale::{Locale, Translations},
};

use super::db::TestDb;

pub(crate) const TEST_ASSET_BASE_URL: &str = "https://auvea.test/storage";

pub(crate) struct TestContext {
    pub db: TestDb,
    pub users: PgUsersService,
    pub auth: PgAuthService,
    pub products: PgProductsService,
    pub coupons: PgCouponsService,
    pub carts: PgCartsService,
    pub orders: PgOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let cache = Arc::new(CatalogCache::default());
        let media = MediaUrls::new(TEST_ASSET_BASE_URL);

        Self {
            users: PgUsersService::new(db.clone()),
            auth: PgAuthService::new(test_db.pool().clone()),
            products: PgProductsService::new(db.clone(), Arc::clone(&cache), media.clone()),
            coupons: PgCouponsService::new(db.clone()),
            carts: PgCartsService::new(db.clone(), media, DEFAULT_MAX_ITEM_QUANTITY),
            orders: PgOrdersService::new(db, cache),
            db: test_db,
        }
    }

    pub async fn create_user(&self, email: &str) -> UserUuid {
        self.users
            .create_user(NewUser {
                uuid: UserUuid::new(),
                name: "Test Shopper".to_string(),
                email: email.to_string(),
                locale: Locale::En,
            })
            .await
            .expect("Failed to create test user")
            .uuid
    }

    pub async fn create_category(&self, slug: &str) -> CategoryUuid {
        self.products
            .create_category(NewCategory {
                uuid: CategoryUuid::new(),
                name: Translations::new()
                    .with(Locale::En, slug)
                    .with(Locale::Ar, format!("{slug} (ar)")),
                slug: slug.to_string(),
                is_active: true,
            })
            .await
            .expect("Failed to create test category")
            .uuid
    }

    pub async fn create_product(
        &self,
        category: CategoryUuid,
        price: Decimal,
        discount_price: Option<Decimal>,
    ) -> ProductRecord {
        let uuid = ProductUuid::new();

        self.products
            .create_product(NewProduct {
                uuid,
                category,
                name: Translations::new()
                    .with(Locale::En, format!("Design {uuid}"))
                    .with(Locale::Ar, format!("تصميم {uuid}")),
                description: Translations::new().with(Locale::En, "Test design"),
                sku: format!("SKU-{}", uuid.into_uuid().simple()),
                price,
                discount_price,
                is_featured: false,
                is_active: true,
                images: vec!["products/main.png".to_string()],
                preview_images: vec![],
            })
            .await
            .expect("Failed to create test product")
    }

    pub async fn create_coupon(
        &self,
        code: &str,
        kind: CouponType,
        value: Decimal,
        minimum_amount: Option<Decimal>,
    ) -> CouponRecord {
        self.coupons
            .create_coupon(NewCoupon {
                uuid: CouponUuid::new(),
                code: code.to_string(),
                name: None,
                description: None,
                kind,
                value,
                minimum_amount,
                usage_limit: None,
                user_limit: None,
                starts_at: None,
                expires_at: None,
                is_active: true,
            })
            .await
            .expect("Failed to create test coupon")
    }
}
