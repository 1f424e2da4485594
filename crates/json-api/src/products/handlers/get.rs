//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::ApiError,
    extensions::*,
    products::{errors::into_api_error, responses::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductEnvelope {
    pub success: bool,

    pub data: ProductResponse,
}

/// Get Product Handler
///
/// Returns an active product and counts the view.
#[endpoint(tags("products"), summary = "Get Product")]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into(), locale.into_locale())
        .await
        .map_err(into_api_error)?;

    Ok(Json(ProductEnvelope {
        success: true,
        data: product.into(),
    }))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use auvea_app::{
        domain::products::{MockProductsService, ProductsServiceError, records::ProductUuid},
        locale::Locale,
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{make_product_view, products_service},
    };

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products/{product}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_localized_product() -> TestResult {
        let uuid = ProductUuid::new();
        let view = make_product_view(uuid, dec!(95.50));

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |product, locale| *product == uuid && *locale == Locale::Ar)
            .return_once(move |_, _| Ok(view));

        let mut res = TestClient::get(format!("http://example.com/products/{uuid}?locale=ar"))
            .send(&make_service(products))
            .await;

        let body: ProductEnvelope = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success, "expected success");
        assert_eq!(body.data.id, uuid.into_uuid());
        assert_eq!(body.data.price, dec!(95.50));
        assert_eq!(body.data.category.slug, "rings");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_locale_falls_back_to_english() -> TestResult {
        let uuid = ProductUuid::new();
        let view = make_product_view(uuid, dec!(10.00));

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |product, locale| *product == uuid && *locale == Locale::En)
            .return_once(move |_, _| Ok(view));

        let res = TestClient::get(format!("http://example.com/products/{uuid}?locale=fr"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(move |product, _| *product == uuid)
            .return_once(|_, _| Err(ProductsServiceError::NotFound));

        let mut res = TestClient::get(format!("http://example.com/products/{uuid}"))
            .send(&make_service(products))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "product_not_found");

        Ok(())
    }
}
