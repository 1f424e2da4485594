//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity, at least 1; kept within the per-line maximum
    pub quantity: i64,
}

/// Update Cart Item Handler
///
/// `item` is either a product id or a cart item id.
#[endpoint(tags("cart"), summary = "Update Cart Item Quantity")]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let cart = state
        .app
        .carts
        .update_item_quantity(
            depot.shopper(),
            item.into_inner(),
            json.into_inner().quantity,
            locale.into_locale(),
        )
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
