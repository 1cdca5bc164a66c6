//! JWT token management

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Lifetime of every issued token
pub const TOKEN_LIFETIME_HOURS: i64 = 3;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// A freshly signed token with its validity window
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// JWT manager for token generation and validation
///
/// Holds the HS256 key loaded at startup. The key never changes for the
/// lifetime of the manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager").finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Create a new JWT manager from the shared secret
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::MissingSigningKey);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Issue a token for `subject`, valid for [`TOKEN_LIFETIME_HOURS`]
    pub fn issue_token(&self, subject: &str) -> Result<IssuedToken, AuthError> {
        self.issue_token_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_token_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + Duration::hours(TOKEN_LIFETIME_HOURS);

        let claims = Claims {
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing token for user: {}", subject);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: now,
            expires_at,
        })
    }

    /// Validate a JWT token and return claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Validate a JWT token against the clock value `now`
    ///
    /// Only HS256 is accepted. A token is expired once `now` is strictly
    /// past its `exp`, with no leeway.
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        if now.timestamp() > token_data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
