//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use auvea_app::{domain::products::data::CatalogQuery, pagination::PageRequest};

use crate::{
    errors::ApiError,
    extensions::*,
    pagination::PageMeta,
    products::{errors::into_api_error, responses::ProductResponse},
    state::State,
};

/// Catalog page size when none is requested.
pub(crate) const DEFAULT_PRODUCTS_PER_PAGE: u32 = 12;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    pub success: bool,

    /// Featured products first, then newest
    pub data: Vec<ProductResponse>,

    pub meta: PageMeta,
}

/// Product Index Handler
///
/// Returns a page of active products.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    locale: QueryParam<String, false>,
    category: QueryParam<Uuid, false>,
    featured: QueryParam<bool, false>,
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let catalog = CatalogQuery {
        locale: locale.into_locale(),
        category: category.into_inner().map(Into::into),
        featured: featured.into_inner(),
        page: PageRequest::new(
            page.into_inner(),
            per_page.into_inner(),
            DEFAULT_PRODUCTS_PER_PAGE,
        ),
    };

    let products = state
        .app
        .products
        .list_products(catalog)
        .await
        .map_err(into_api_error)?;

    let meta = PageMeta::from(&products);

    Ok(Json(ProductsResponse {
        success: true,
        data: products.items.into_iter().map(Into::into).collect(),
        meta,
    }))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use auvea_app::{
        domain::products::{
            MockProductsService, ProductsServiceError,
            records::{CategoryUuid, ProductUuid},
        },
        locale::Locale,
        pagination::Page,
    };

    use crate::test_helpers::{make_product_view, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_index_uses_default_paging_and_locale() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|catalog| {
                *catalog
                    == CatalogQuery {
                        locale: Locale::En,
                        category: None,
                        featured: None,
                        page: PageRequest {
                            page: 1,
                            per_page: DEFAULT_PRODUCTS_PER_PAGE,
                        },
                    }
            })
            .return_once(|catalog| Ok(Page::new(vec![], catalog.page, 0)));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success, "expected success");
        assert!(body.data.is_empty(), "expected no products");
        assert_eq!(
            body.meta,
            PageMeta {
                current_page: 1,
                last_page: 1,
                per_page: DEFAULT_PRODUCTS_PER_PAGE,
                total: 0,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters() -> TestResult {
        let category = CategoryUuid::new();
        let product = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(move |catalog| {
                catalog.locale == Locale::Ar
                    && catalog.category == Some(category)
                    && catalog.featured == Some(true)
                    && catalog.page == PageRequest { page: 2, per_page: 1 }
            })
            .return_once(move |catalog| {
                Ok(Page::new(
                    vec![make_product_view(product, dec!(120.00))],
                    catalog.page,
                    3,
                ))
            });

        let mut res = TestClient::get(format!(
            "http://example.com/products?locale=ar&category={category}&featured=true&page=2&per_page=1"
        ))
        .send(&make_service(products))
        .await;

        let body: ProductsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.data.len(), 1, "expected one product");
        assert_eq!(body.data[0].id, product.into_uuid());
        assert_eq!(body.data[0].final_price, dec!(120.00));
        assert_eq!(body.meta.last_page, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_storage_error_returns_500() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .return_once(|_| Err(ProductsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
