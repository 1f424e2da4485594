//! API Token Records

use jiff::Timestamp;

use crate::{auth::BearerToken, domain::users::records::UserUuid, uuids::TypedUuid};

/// API Token UUID
pub type ApiTokenUuid = TypedUuid<ApiTokenRecord>;

/// API Token Record
///
/// Everything stored about a token except its digest.
#[derive(Debug, Clone)]
pub struct ApiTokenRecord {
    pub uuid: ApiTokenUuid,
    pub user: UserUuid,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// A token as issued. The plaintext cannot be recovered later.
#[derive(Debug)]
pub struct IssuedApiToken {
    pub token: BearerToken,
    pub record: ApiTokenRecord,
}
