use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{JwtConfig, MAX_ACCESS_TTL_MINUTES, MAX_REFRESH_TTL_HOURS};
use crate::types::User;

const ISSUER: &str = "flyspray";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,

    #[error("expected a {expected:?} token")]
    WrongKind { expected: TokenKind },

    #[error("failed to sign token")]
    Signing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Signs and checks the HS256 access and refresh tokens handed out at
/// sign-in.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Lifetimes outside `0..=MAX_*` are clamped so that expiry
    /// arithmetic cannot overflow.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: Duration::minutes(
                config.access_ttl_minutes.clamp(0, MAX_ACCESS_TTL_MINUTES),
            ),
            refresh_ttl: Duration::hours(
                config.refresh_ttl_hours.clamp(0, MAX_REFRESH_TTL_HOURS),
            ),
        }
    }

    pub fn access_token(&self, user: &User) -> Result<String, TokenError> {
        self.sign(user, TokenKind::Access, self.access_ttl)
    }

    pub fn refresh_token(&self, user: &User) -> Result<String, TokenError> {
        self.sign(user, TokenKind::Refresh, self.refresh_ttl)
    }

    fn sign(&self, user: &User, kind: TokenKind, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now.checked_add_signed(ttl).ok_or(TokenError::Signing)?;
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            kind,
            iat: now.timestamp(),
            exp: expires.timestamp(),
            iss: ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {e}");
            TokenError::Signing
        })
    }

    /// Checks signature, issuer, expiry and that the token is of `expected`
    /// kind.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if data.claims.kind != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(data.claims)
    }
}
