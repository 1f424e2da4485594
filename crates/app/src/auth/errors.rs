//! Auth service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// Malformed, unknown, revoked, or not matching its stored digest.
    #[error("token not found")]
    NotFound,

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
