//! Remove Coupon Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Remove Coupon Handler
#[endpoint(tags("cart"), summary = "Remove Coupon")]
pub(crate) async fn handler(
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .remove_coupon(depot.shopper(), locale.into_locale())
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use auvea_app::domain::{carts::MockCartsService, products::records::ProductUuid};

    use crate::{
        auth::session::SESSION_HEADER,
        carts::handlers::tests::make_cart,
        test_helpers::{TEST_SESSION_ID, carts_service},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/coupon").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_coupon_restores_full_price() -> TestResult {
        let cart = make_cart(ProductUuid::new(), dec!(80.00), 2);

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_coupon()
            .once()
            .withf(|shopper, _| shopper.session.is_some())
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::delete("http://example.com/cart/coupon")
            .add_header(SESSION_HEADER, TEST_SESSION_ID, true)
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.coupon, None);
        assert_eq!(body.discount_amount, dec!(0));
        assert_eq!(body.total, dec!(160.00));

        Ok(())
    }
}
