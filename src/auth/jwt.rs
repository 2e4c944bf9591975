use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::role::Role;

/// JWT claims embedded in a session token.
///
/// Tokens are stateless: validity is fully determined by the signature and the
/// `exp` claim. The server keeps no revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID as a UUID string.
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued-at time (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Parse the `sub` claim back into a user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a valid UUID.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        self.sub.parse()
    }
}

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature mismatch or malformed structure.
    Invalid,
    /// Structurally valid and correctly signed, but past its expiry.
    Expired,
}

/// Sign a session token for the given user.
///
/// Pure function of secret + claims + clock; no side effects.
///
/// # Errors
///
/// Returns an error if JWT encoding fails.
pub fn issue(
    user_id: Uuid,
    username: &str,
    role: Role,
    secret: &str,
    ttl_secs: u64,
) -> anyhow::Result<String> {
    let now = Utc::now().timestamp();

    #[allow(clippy::cast_possible_wrap)]
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        iat: now,
        exp: now + ttl_secs as i64,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| anyhow::anyhow!("Failed to encode session token: {e}"))
}

/// Verify a session token and return its claims.
///
/// Never panics on attacker-supplied input; any structural or signature
/// problem is reported as `TokenError::Invalid`, expiry as `TokenError::Expired`.
///
/// # Errors
///
/// Returns `TokenError` describing why verification failed.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            ErrorKind::ExpiredSignature => Err(TokenError::Expired),
            _ => Err(TokenError::Invalid),
        },
    }
}
