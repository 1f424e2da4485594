//! Apply Coupon Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use auvea_app::domain::carts::CartsServiceError;

use crate::{
    carts::{errors::into_api_error, responses::CartResponse},
    errors::{ApiError, FieldErrors},
    extensions::*,
    observability::record_coupon_attempt,
    state::State,
};

const MAX_COUPON_CODE_LEN: usize = 50;

/// Apply Coupon Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApplyCouponRequest {
    /// Coupon code, matched case-insensitively
    pub code: String,
}

impl ApplyCouponRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let code = self.code.trim();

        let problem = if code.is_empty() {
            "is required"
        } else if code.chars().count() > MAX_COUPON_CODE_LEN {
            "may not be longer than 50 characters"
        } else {
            return Ok(());
        };

        Err(ApiError::validation(FieldErrors::from([(
            "code".to_string(),
            vec![problem.to_string()],
        )])))
    }
}

/// Apply Coupon Handler
///
/// Attaches a valid coupon to a non-empty cart.
#[endpoint(tags("cart"), summary = "Apply Coupon")]
pub(crate) async fn handler(
    json: JsonBody<ApplyCouponRequest>,
    locale: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let request = json.into_inner();

    request.validate()?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    let result = state
        .app
        .carts
        .apply_coupon(depot.shopper(), request.code, locale.into_locale())
        .await;

    match &result {
        Ok(_) => record_coupon_attempt(true),
        Err(CartsServiceError::InvalidCoupon) => record_coupon_attempt(false),
        Err(_) => {}
    }

    Ok(Json(result.map_err(into_api_error)?.into()))
}
