//! User Data

use crate::{domain::users::records::UserUuid, locale::Locale};

/// New User Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub locale: Locale,
}
