use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

pub mod password;
pub mod session;

pub use session::{SessionCheck, SessionStore};

/// Claims carried by every issued token. Self-contained: validity is
/// signature + expiry only, with no server-side revocation list. Revocation
/// happens one level up, through the session cross-check.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: i64,
    pub username: String,
    /// Expiry (Unix timestamp, seconds). Fixed at issuance, never extended.
    pub exp: i64,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token generation failed: {0}")]
    Generation(String),
    #[error("jwt secret is not configured")]
    InvalidSecret,
    #[error("token expired")]
    Expired,
    #[error("{0}")]
    Invalid(String),
}

/// Issues and validates signed identity tokens using a process-wide secret.
/// Rotating the secret invalidates all outstanding tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours as i64),
        })
    }

    pub fn from_config() -> Result<Self, TokenError> {
        let security = &config::config().security;
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    /// Issue a token for an authenticated user, expiring `expiry` from now.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.issue_at(Utc::now(), user_id, username)
    }

    /// Issue with an explicit clock, the seam expiry tests drive.
    pub fn issue_at(
        &self,
        now: DateTime<Utc>,
        user_id: i64,
        username: &str,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    /// Decode and verify a token. Any verification failure is terminal for
    /// that token; there is no refresh path.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            },
        )?;
        Ok(token_data.claims)
    }
}
