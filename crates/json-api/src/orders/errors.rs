//! Order Errors

use tracing::error;

use auvea_app::domain::orders::{
    OrdersServiceError,
    finalizer::{OrderRejection, OrderRejections},
};

use crate::errors::{ApiError, FieldErrors};

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::ValidationFailed(rejections) => rejected(&rejections),
        OrdersServiceError::CreationFailed(source) => {
            error!("failed to create order: {source}");

            ApiError::internal_with("order_creation_failed")
        }
        OrdersServiceError::NotFound => ApiError::not_found("order_not_found"),
        OrdersServiceError::Sql(source) => {
            error!("failed to read orders: {source}");

            ApiError::internal()
        }
        error @ (OrdersServiceError::InvalidReference | OrdersServiceError::InvalidData) => {
            error!("unexpected order error: {error}");

            ApiError::internal()
        }
    }
}

/// A refused checkout. The message names the first problem found; `errors` lists each.
fn rejected(rejections: &OrderRejections) -> ApiError {
    let Some(first) = rejections.first() else {
        return ApiError::bad_request("validation_failed");
    };

    let message = match first {
        OrderRejection::CartEmpty => "cart_empty",
        OrderRejection::ProductUnavailable { .. } => "some_products_invalid",
        OrderRejection::TotalMismatch { .. } => "total_mismatch",
    };

    let mut errors = FieldErrors::new();

    for rejection in rejections {
        let (field, problem) = match rejection {
            OrderRejection::CartEmpty => ("items".to_string(), "cart is empty".to_string()),
            OrderRejection::ProductUnavailable { index, .. } => (
                format!("items.{index}.product_id"),
                "product is not available".to_string(),
            ),
            OrderRejection::TotalMismatch { expected, .. } => (
                "total".to_string(),
                format!("total does not match the cart total of {expected:.2}"),
            ),
        };

        errors.entry(field).or_default().push(problem);
    }

    ApiError::bad_request(message).with_errors(errors)
}
