//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// `item` is either a product id or a cart item id.
#[endpoint(tags("cart"), summary = "Remove Cart Item")]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .remove_item(depot.shopper(), item.into_inner(), locale.into_locale())
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
