//! Bearer token authentication

mod errors;
mod records;
mod repository;
mod service;
mod token;

pub use errors::AuthServiceError;
pub use records::*;
pub use service::*;
pub use token::{BearerToken, TOKEN_PREFIX, TokenFormatError};
