//! Signed access tokens (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;

use shine_store_core::{AccessClaims, Role};

use super::error::TokenError;
use crate::config::TokenConfig;

/// Issues and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("keys", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Build an issuer from token configuration.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::LifetimeOutOfRange` if the configured lifetime
    /// does not fit in a timestamp offset.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        let secret = config.secret.expose_secret().as_bytes();
        let ttl =
            chrono::Duration::from_std(config.ttl).map_err(|_| TokenError::LifetimeOutOfRange)?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        })
    }

    /// Sign a token for `email` with `role`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue(&self, email: &str, role: Role) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;

        let claims = AccessClaims {
            email: email.to_owned(),
            role,
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// Not used by any route here; downstream consumers verify tokens with it.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, malformed token, or
    /// expired token.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
