//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use auvea_app::domain::{
    carts::data::{SessionToken, Shopper},
    users::records::UserUuid,
};

use crate::errors::ApiError;

/// Helpers for request-scoped identity and depot extraction failures.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_user_uuid(&mut self, user: UserUuid);

    fn user_uuid(&self) -> Option<UserUuid>;

    fn user_uuid_or_401(&self) -> Result<UserUuid, ApiError>;

    fn insert_session_token(&mut self, session: SessionToken);

    /// The authenticated user and guest session of this request, either of which may
    /// be missing.
    fn shopper(&self) -> Shopper;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.inject(user);
    }

    fn user_uuid(&self) -> Option<UserUuid> {
        self.obtain::<UserUuid>().ok().copied()
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, ApiError> {
        self.user_uuid().ok_or_else(ApiError::unauthorized)
    }

    fn insert_session_token(&mut self, session: SessionToken) {
        self.inject(session);
    }

    fn shopper(&self) -> Shopper {
        Shopper::new(self.user_uuid(), self.obtain::<SessionToken>().ok().cloned())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn empty_depot_is_an_anonymous_shopper() {
        let depot = Depot::new();

        assert!(depot.shopper().is_anonymous(), "expected no identity");
        assert!(depot.user_uuid_or_401().is_err(), "expected 401");
    }

    #[test]
    fn shopper_combines_user_and_session() -> TestResult {
        let mut depot = Depot::new();
        let user = UserUuid::new();
        let session = SessionToken::parse("guest-session-0001")?;

        depot.insert_user_uuid(user);
        depot.insert_session_token(session.clone());

        assert_eq!(depot.shopper(), Shopper::new(Some(user), Some(session)));
        assert_eq!(depot.user_uuid_or_401().ok(), Some(user));

        Ok(())
    }
}
