//! Cart Data

use thiserror::Error;

use crate::domain::{products::records::ProductUuid, users::records::UserUuid};

/// Shortest accepted guest session token.
pub const MIN_SESSION_TOKEN_LEN: usize = 10;

/// Longest accepted guest session token.
pub const MAX_SESSION_TOKEN_LEN: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("session token must be at least {MIN_SESSION_TOKEN_LEN} characters")]
    TooShort,

    #[error("session token must be at most {MAX_SESSION_TOKEN_LEN} characters")]
    TooLong,
}

/// Opaque client-generated token identifying a guest's browser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Validate a raw token after trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error when the trimmed token is too short or too long.
    pub fn parse(raw: &str) -> Result<Self, SessionTokenError> {
        let token = raw.trim();
        let len = token.chars().count();

        if len < MIN_SESSION_TOKEN_LEN {
            return Err(SessionTokenError::TooShort);
        }

        if len > MAX_SESSION_TOKEN_LEN {
            return Err(SessionTokenError::TooLong);
        }

        Ok(Self(token.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Who is asking for a cart.
///
/// A user cart takes precedence; a session token alongside a user marks a guest cart
/// to merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shopper {
    pub user: Option<UserUuid>,
    pub session: Option<SessionToken>,
}

impl Shopper {
    #[must_use]
    pub fn new(user: Option<UserUuid>, session: Option<SessionToken>) -> Self {
        Self { user, session }
    }

    #[must_use]
    pub fn user(user: UserUuid) -> Self {
        Self::new(Some(user), None)
    }

    #[must_use]
    pub fn guest(session: SessionToken) -> Self {
        Self::new(None, Some(session))
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.user.is_none() && self.session.is_none()
    }
}

/// New Cart Item Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product: ProductUuid,
    /// Defaults to 1 when absent.
    pub quantity: Option<i64>,
}

impl NewCartItem {
    /// Requested quantity kept within `1..=max`.
    #[must_use]
    pub fn clamped_quantity(&self, max: u32) -> u32 {
        let max = max.max(1);

        self.quantity
            .unwrap_or(1)
            .clamp(1, i64::from(max))
            .try_into()
            .unwrap_or(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_is_trimmed_and_length_checked() {
        assert_eq!(
            SessionToken::parse("  tok_abcdef1234 ").map(|token| token.as_str().to_string()),
            Ok("tok_abcdef1234".to_string())
        );
        assert_eq!(
            SessionToken::parse("   short   "),
            Err(SessionTokenError::TooShort)
        );
        assert_eq!(
            SessionToken::parse(&"x".repeat(256)),
            Err(SessionTokenError::TooLong)
        );
    }

    #[test]
    fn new_item_quantity_defaults_and_clamps() {
        let product = ProductUuid::new();
        let item = |quantity| NewCartItem { product, quantity };

        assert_eq!(item(None).clamped_quantity(100), 1);
        assert_eq!(item(Some(0)).clamped_quantity(100), 1);
        assert_eq!(item(Some(-4)).clamped_quantity(100), 1);
        assert_eq!(item(Some(7)).clamped_quantity(100), 7);
        assert_eq!(item(Some(5_000)).clamped_quantity(100), 100);
    }
}
