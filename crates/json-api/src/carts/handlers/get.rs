//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the caller's priced cart. Callers without a session or user get an empty
/// cart.
#[endpoint(tags("cart"), summary = "Get Cart")]
pub(crate) async fn handler(
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .get_cart(depot.shopper(), locale.into_locale())
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use auvea_app::{
        domain::{
            carts::{MockCartsService, data::Shopper},
            pricing::PricedCart,
            products::records::ProductUuid,
        },
        locale::Locale,
    };

    use crate::{
        auth::session::SESSION_HEADER,
        carts::handlers::tests::{make_cart, make_discounted_cart},
        test_helpers::{TEST_BEARER_TOKEN, TEST_SESSION_ID, TEST_USER_UUID, carts_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_anonymous_caller_gets_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|shopper, locale| shopper.is_anonymous() && *locale == Locale::En)
            .return_once(|_, _| Ok(PricedCart::default()));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success, "expected success");
        assert!(body.items.is_empty(), "expected no items");
        assert_eq!(body.coupon_code, None);
        assert_eq!(body.total, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_guest_cart_is_priced_for_the_session() -> TestResult {
        let product = ProductUuid::new();
        let cart = make_cart(product, dec!(80.00), 2);

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|shopper, locale| {
                shopper.user.is_none()
                    && shopper.session.as_ref().map(|s| s.as_str()) == Some(TEST_SESSION_ID)
                    && *locale == Locale::Ar
            })
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart?locale=ar")
            .add_header(SESSION_HEADER, TEST_SESSION_ID, true)
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.items.len(), 1, "expected one line");
        assert_eq!(body.items[0].id, product.into_uuid());
        assert_eq!(body.items[0].quantity, 2);
        assert_eq!(body.subtotal, dec!(160.00));
        assert_eq!(body.total, dec!(160.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_user_cart_shows_coupon_discount() -> TestResult {
        let cart = make_discounted_cart(ProductUuid::new());

        let mut carts = MockCartsService::new();

        carts
            .expect_get_cart()
            .once()
            .withf(|shopper, _| *shopper == Shopper::user(TEST_USER_UUID))
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .add_header(AUTHORIZATION, format!("Bearer {TEST_BEARER_TOKEN}"), true)
            .send(&make_service(carts))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["coupon_code"], "SAVE10");
        assert_eq!(body["coupon"]["type"], "percent");
        assert_eq!(body["subtotal"], 160.0);
        assert_eq!(body["discount_amount"], 16.0);
        assert_eq!(body["total"], 144.0);

        Ok(())
    }
}
