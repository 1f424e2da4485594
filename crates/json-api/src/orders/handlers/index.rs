//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use auvea_app::pagination::PageRequest;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, responses::OrderResponse},
    pagination::PageMeta,
    state::State,
};

/// Order history page size when none is requested.
pub(crate) const DEFAULT_ORDERS_PER_PAGE: u32 = 15;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub success: bool,

    /// Newest first
    pub data: Vec<OrderResponse>,

    pub meta: PageMeta,
}

/// Order Index Handler
///
/// Returns the caller's orders.
#[endpoint(tags("orders"), summary = "List Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    per_page: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(
            user,
            PageRequest::new(
                page.into_inner(),
                per_page.into_inner(),
                DEFAULT_ORDERS_PER_PAGE,
            ),
        )
        .await
        .map_err(into_api_error)?;

    let meta = PageMeta::from(&orders);

    Ok(Json(OrdersResponse {
        success: true,
        data: orders.items.into_iter().map(Into::into).collect(),
        meta,
    }))
}
