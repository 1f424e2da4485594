//! Errors

use tracing::error;

use auvea_app::domain::carts::CartsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::MissingSessionIdentity => ApiError::bad_request("session_required"),
        CartsServiceError::ProductUnavailable | CartsServiceError::InvalidReference => {
            ApiError::not_found("product_unavailable")
        }
        CartsServiceError::ItemNotFound => ApiError::not_found("cart_item_not_found"),
        CartsServiceError::NotFound => ApiError::not_found("cart_not_found"),
        CartsServiceError::InvalidQuantity => ApiError::unprocessable("invalid_quantity"),
        CartsServiceError::InvalidCoupon => ApiError::unprocessable("invalid_coupon"),
        CartsServiceError::CartEmpty => ApiError::unprocessable("cart_empty"),
        CartsServiceError::Sql(source) => {
            error!("failed to update cart: {source}");

            ApiError::internal()
        }
        error @ (CartsServiceError::AlreadyExists
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData) => {
            error!("unexpected cart error: {error}");

            ApiError::internal()
        }
    }
}
