//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::{JsonBody, QueryParam},
    prelude::*,
};

use auvea_app::domain::orders::data::NewOrder;

use crate::{
    errors::ApiError,
    extensions::*,
    observability::{record_checkout_rejection, record_order_placed},
    orders::{
        errors::into_api_error, requests::CreateOrderRequest, responses::OrderCreatedResponse,
    },
    state::State,
};

/// Create Order Handler
///
/// Places a cash-on-delivery order from the caller's cart. Prices and totals are
/// recomputed from the catalog; the claimed total must agree within one cent.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    locale: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, ApiError> {
    let order = NewOrder::try_from(json.into_inner())?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = match state
        .app
        .orders
        .place_order(depot.shopper(), order, locale.into_locale())
        .await
    {
        Ok(order) => order,
        Err(error) => {
            let error = into_api_error(error);

            if error.status() == StatusCode::BAD_REQUEST {
                record_checkout_rejection(error.message());
            }

            return Err(error);
        }
    };

    record_order_placed();

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
