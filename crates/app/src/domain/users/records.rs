//! User Records

use jiff::Timestamp;

use crate::{locale::Locale, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub locale: Locale,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
