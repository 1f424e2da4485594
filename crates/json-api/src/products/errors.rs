//! Product Errors

use tracing::error;

use auvea_app::domain::products::ProductsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: ProductsServiceError) -> ApiError {
    match error {
        ProductsServiceError::NotFound => ApiError::not_found("product_not_found"),
        ProductsServiceError::Sql(source) => {
            error!("failed to read catalog: {source}");

            ApiError::internal()
        }
        error @ (ProductsServiceError::AlreadyExists
        | ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData) => {
            error!("unexpected catalog error: {error}");

            ApiError::internal()
        }
    }
}
