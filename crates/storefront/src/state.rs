//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::{ProductStore, UserStore};
use crate::services::{AuthError, AuthService, CatalogService, TokenError, TokenIssuer};

/// Error assembling application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("token configuration error: {0}")]
    Token(#[from] TokenError),
    #[error("auth service error: {0}")]
    Auth(#[from] AuthError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store-backed services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogService,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `products` - Product collection
    /// * `users` - User collection
    ///
    /// # Errors
    ///
    /// Returns an error if the token configuration is unusable.
    pub fn new(
        config: StorefrontConfig,
        products: Arc<dyn ProductStore>,
        users: Arc<dyn UserStore>,
    ) -> Result<Self, StateError> {
        let tokens = TokenIssuer::new(&config.token)?;
        let auth = AuthService::new(users, tokens)?;
        let catalog = CatalogService::new(products);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                auth,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
