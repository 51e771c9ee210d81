pub mod password;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};

pub use password::{hash_password, verify_password, verify_unknown_user, PasswordError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub kader_id: i32,
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(kader_id: i32, issuer: &str, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            kader_id,
            sub: kader_id.to_string(),
            iss: issuer.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

/// Reasons a bearer token is refused. Each kind carries its own client message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token tidak berformat benar.")]
    Malformed,

    #[error("Token sudah kadaluarsa atau belum aktif.")]
    Expired,

    #[error("Token sudah kadaluarsa atau belum aktif.")]
    NotYetValid,

    #[error("Signature token tidak valid.")]
    SignatureInvalid,

    #[error("Token tidak valid.")]
    Invalid,

    #[error("JWT generation error: {0}")]
    Generation(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            _ => TokenError::Invalid,
        }
    }
}

struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

/// Issues and verifies HS256 session tokens for kader accounts.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<TokenKeys>,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            keys: Arc::new(TokenKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                issuer: issuer.into(),
                ttl,
            }),
        }
    }

    /// Lifetimes beyond [`MAX_JWT_EXPIRY_HOURS`] are clamped; `AppConfig` already rejects them.
    pub fn from_config(security: &SecurityConfig) -> Self {
        let hours = security.jwt_expiry_hours.clamp(1, MAX_JWT_EXPIRY_HOURS);
        let hours = i64::try_from(hours).unwrap_or(24);
        Self::new(&security.jwt_secret, security.jwt_issuer.clone(), Duration::hours(hours))
    }

    pub fn issue(&self, kader_id: i32) -> Result<String, TokenError> {
        self.issue_at(kader_id, Utc::now())
    }

    pub fn issue_at(&self, kader_id: i32, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(kader_id, &self.keys.issuer, issued_at, self.keys.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.keys.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

        let data = decode::<Claims>(token, &self.keys.decoding, &validation)?;
        if data.claims.sub != data.claims.kader_id.to_string() {
            return Err(TokenError::Invalid);
        }
        Ok(data.claims)
    }
}
