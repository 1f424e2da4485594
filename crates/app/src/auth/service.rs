//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;

use crate::{
    auth::{
        ApiTokenUuid, AuthServiceError, BearerToken, IssuedApiToken,
        repository::PgAuthRepository,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new bearer token for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be stored.
    pub async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        let token = BearerToken::generate(ApiTokenUuid::new());

        let record = self
            .repository
            .create_api_token(token.id(), user, &token.digest())
            .await?;

        Ok(IssuedApiToken { token, record })
    }

    /// Revoke a token. Returns `true` if it was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token: ApiTokenUuid) -> Result<bool, AuthServiceError> {
        Ok(self.repository.revoke_api_token(token).await?.is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(name = "auth.service.authenticate_bearer", skip_all, err(level = "debug"))]
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let Ok(token) = BearerToken::parse(bearer_token) else {
            return Err(AuthServiceError::NotFound);
        };

        let active = self
            .repository
            .find_active_api_token(token.id())
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !token.matches(&active.token_hash) {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(source) = self.repository.touch_api_token_last_used(token.id()).await {
            warn!(token_uuid = %token.id(), "failed to touch api token: {source}");
        }

        Ok(active.user)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve the user owning a presented bearer token.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_its_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("token@example.com").await;

        let issued = ctx.auth.issue_api_token(user).await?;
        let authenticated = ctx.auth.authenticate_bearer(issued.token.as_str()).await?;

        assert_eq!(authenticated, user);
        assert_eq!(issued.record.user, user);
        assert!(issued.record.revoked_at.is_none(), "fresh token is active");

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("tamper@example.com").await;

        let issued = ctx.auth.issue_api_token(user).await?;
        let (head, secret) = issued.token.as_str().split_once('.').ok_or("token has no secret")?;
        let flipped = if secret.starts_with('0') { "1" } else { "0" };
        let tampered = format!("{head}.{flipped}{}", &secret[1..]);

        let result = ctx.auth.authenticate_bearer(&tampered).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user("revoked@example.com").await;

        let issued = ctx.auth.issue_api_token(user).await?;

        assert!(ctx.auth.revoke_api_token(issued.record.uuid).await?);
        assert!(!ctx.auth.revoke_api_token(issued.record.uuid).await?);

        let result = ctx.auth.authenticate_bearer(issued.token.as_str()).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
