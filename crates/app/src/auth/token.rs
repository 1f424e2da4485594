//! Bearer token format and digests.
//!
//! Tokens look like `auv_v1_<token uuid>.<64 hex secret>`; only the SHA-256 digest of
//! the whole token is stored.

use std::fmt::{self, Write as _};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::auth::ApiTokenUuid;

pub const TOKEN_PREFIX: &str = "auv_v1_";

const SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenFormatError {
    #[error("token does not start with {TOKEN_PREFIX}")]
    Prefix,

    #[error("token id is not a uuid")]
    Id,

    #[error("token secret is not {} hex characters", SECRET_BYTES * 2)]
    Secret,
}

/// A plaintext bearer token, wiped from memory on drop.
pub struct BearerToken {
    id: ApiTokenUuid,
    plaintext: Zeroizing<String>,
}

impl BearerToken {
    /// Mint a token with a fresh random secret.
    #[must_use]
    pub fn generate(id: ApiTokenUuid) -> Self {
        let mut secret = Zeroizing::new([0_u8; SECRET_BYTES]);

        OsRng.fill_bytes(&mut *secret);

        let plaintext = Zeroizing::new(format!(
            "{TOKEN_PREFIX}{}.{}",
            id.into_uuid().simple(),
            encode_hex(&*secret)
        ));

        Self { id, plaintext }
    }

    /// Check a presented token's shape. Says nothing about whether it is valid.
    ///
    /// # Errors
    ///
    /// Returns the first part of the token that is malformed.
    pub fn parse(token: &str) -> Result<Self, TokenFormatError> {
        let rest = token
            .strip_prefix(TOKEN_PREFIX)
            .ok_or(TokenFormatError::Prefix)?;

        let (id, secret) = rest.split_once('.').ok_or(TokenFormatError::Secret)?;

        let id = Uuid::try_parse(id).ok().ok_or(TokenFormatError::Id)?;

        if secret.len() != SECRET_BYTES * 2 || !secret.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TokenFormatError::Secret);
        }

        Ok(Self {
            id: ApiTokenUuid::from_uuid(id),
            plaintext: Zeroizing::new(token.to_string()),
        })
    }

    #[must_use]
    pub fn id(&self) -> ApiTokenUuid {
        self.id
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.plaintext
    }

    /// Hex SHA-256 of the full token.
    #[must_use]
    pub fn digest(&self) -> String {
        encode_hex(&Sha256::digest(self.plaintext.as_bytes()))
    }

    /// Compare against a stored digest in constant time.
    #[must_use]
    pub fn matches(&self, stored: &str) -> bool {
        self.digest().as_bytes().ct_eq(stored.as_bytes()).into()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("id", &self.id)
            .field("plaintext", &"**redacted**")
            .finish()
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut encoded, byte| {
            let _ = write!(encoded, "{byte:02x}");
            encoded
        })
}
