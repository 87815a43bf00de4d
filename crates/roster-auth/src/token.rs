//! Access-token issuance and validation.
//!
//! Tokens are JWTs signed with HS256 over a configured shared secret. Claims
//! carry the account identifier (`sub`) and role plus the standard
//! time-bounding fields; lifetime defaults to one hour.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use roster_core::Role;

use crate::error::{AuthError, AuthResult};

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessTokenClaims {
    /// Issuer, from configuration.
    pub iss: String,
    /// Subject: the account identifier.
    pub sub: String,
    /// The account's role at issuance time.
    pub role: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

/// Issues and validates signed, time-bounded access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    lifetime: Duration,
}

impl TokenService {
    /// Creates a token service from a shared secret.
    #[must_use]
    pub fn new(secret: &str, issuer: impl Into<String>, lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            lifetime,
        }
    }

    /// Issues a token for the given account identity and role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn issue(&self, account_id: &str, role: Role) -> AuthResult<String> {
        let now = OffsetDateTime::now_utc();
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            sub: account_id.to_string(),
            role,
            iat: now.unix_timestamp(),
            exp: (now + self.lifetime).unix_timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::token_encoding(e.to_string()))
    }

    /// Decodes and validates a token: signature, expiry, and issuer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for any validation failure.
    pub fn decode(&self, token: &str) -> AuthResult<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::invalid_token(e.to_string()))?;
        Ok(data.claims)
    }
}
