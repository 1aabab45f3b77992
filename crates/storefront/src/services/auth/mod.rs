//! Authentication service.
//!
//! Password registration and login. Login issues a signed access token
//! carrying the account's email and role.

mod error;
mod token;

pub use error::{AuthError, TokenError};
pub use token::TokenIssuer;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{debug, info};

use shine_store_core::{NewUser, Role, StoredUser};

use crate::db::{RepositoryError, UserStore};

/// Hashed once at startup so unknown-email logins still pay for a verification.
const DUMMY_PASSWORD: &str = "shine-store-dummy-password";

/// Authentication service.
///
/// Cheap to clone; the user store and keys are shared.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
    dummy_hash: Arc<str>,
}

impl AuthService {
    /// Create a new authentication service.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if the startup dummy hash cannot be computed.
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Result<Self, AuthError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD)?;
        Ok(Self {
            users,
            tokens,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// The issuer used to sign login tokens.
    #[must_use]
    pub const fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new user with role `user`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateUser` if the email is already registered.
    /// Returns `AuthError::PasswordHash` or `AuthError::Repository` on
    /// unexpected failures.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<StoredUser, AuthError> {
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let user = self
            .users
            .insert(NewUser {
                username: username.to_owned(),
                email: email.to_owned(),
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateUser,
                other => AuthError::Repository(other),
            })?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password, returning a signed access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong. Both cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self.users.find_by_email(email).await?;

        let hash = user
            .as_ref()
            .map_or_else(|| self.dummy_hash.to_string(), |u| u.password_hash.clone());

        let password = password.to_owned();
        let verified =
            tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;

        let Some(user) = user.filter(|_| verified) else {
            debug!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let token = self.tokens.issue(&user.email, user.role)?;
        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash. Unparseable hashes never verify.
fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::config::TokenConfig;
    use crate::db::MemoryStore;

    fn service() -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let tokens = TokenIssuer::new(&TokenConfig {
            secret: SecretString::from("k7#Qm9$vXz2!pL4@wR8&nT6^bY3*hJ5e".to_owned()),
            ttl: Duration::from_secs(86_400),
        })
        .unwrap();
        (AuthService::new(store.clone(), tokens).unwrap(), store)
    }

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();

        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(verify_password("hunter22", &a));
        assert!(!verify_password("hunter23", &a));
        assert!(!verify_password("hunter22", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_register_stores_hash_and_user_role() {
        let (auth, store) = service();

        auth.register("ada", "ada@example.com", "hunter22").await.unwrap();

        let stored = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.username, "ada");
        assert_eq!(stored.role, Role::User);
        assert_ne!(stored.password_hash, "hunter22");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_keeps_first() {
        let (auth, store) = service();

        auth.register("ada", "ada@example.com", "hunter22").await.unwrap();
        let err = auth
            .register("eve", "ada@example.com", "other-pass")
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DuplicateUser));
        let stored = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.username, "ada");
    }

    #[tokio::test]
    async fn test_login_issues_token_with_email_and_role() {
        let (auth, _) = service();
        auth.register("ada", "ada@example.com", "hunter22").await.unwrap();

        let token = auth.login("ada@example.com", "hunter22").await.unwrap();
        let claims = auth.tokens().verify(&token).unwrap();

        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _) = service();
        auth.register("ada", "ada@example.com", "hunter22").await.unwrap();

        let wrong_password = auth.login("ada@example.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("bob@example.com", "hunter22").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_dummy_password_never_logs_in_unknown_user() {
        let (auth, _) = service();
        let err = auth.login("ghost@example.com", DUMMY_PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
