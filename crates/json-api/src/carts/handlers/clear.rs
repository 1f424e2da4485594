//! Clear Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Clear Cart Handler
///
/// Removes every line and the attached coupon.
#[endpoint(tags("cart"), summary = "Clear Cart")]
pub(crate) async fn handler(
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .clear_cart(depot.shopper(), locale.into_locale())
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use auvea_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        pricing::PricedCart,
    };

    use crate::{
        auth::session::SESSION_HEADER,
        test_helpers::{TEST_SESSION_ID, carts_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").delete(handler))
    }

    #[tokio::test]
    async fn test_clear_returns_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .withf(|shopper, _| shopper.session.is_some())
            .return_once(|_, _| Ok(PricedCart::default()));

        let mut res = TestClient::delete("http://example.com/cart")
            .add_header(SESSION_HEADER, TEST_SESSION_ID, true)
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty(), "expected no items");
        assert_eq!(body.coupon_code, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_clear_without_identity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear_cart()
            .once()
            .return_once(|_, _| Err(CartsServiceError::MissingSessionIdentity));

        let res = TestClient::delete("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
