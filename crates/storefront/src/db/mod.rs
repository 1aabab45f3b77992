//! Document store for the storefront.
//!
//! # Database: `shine_store`
//!
//! Each collection is a `PostgreSQL` table holding one `JSONB` document per
//! row:
//!
//! - `products` - Catalog documents, keyed by UUID, ordered by insertion (`seq`)
//! - `users` - Registered accounts, with a unique index on `email`
//!
//! Handlers never touch the pool directly. They go through the
//! [`ProductStore`] and [`UserStore`] capabilities held in application
//! state, which lets tests swap in [`MemoryStore`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p shine-store-cli -- migrate
//! ```

pub mod memory;
pub mod products;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shine_store_core::{
    DeleteAck, Document, InsertAck, NewUser, ProductFilter, ProductId, ProductRecord, StoredUser,
    UpdateAck,
};

pub use memory::MemoryStore;
pub use products::PgProductStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Product collection capability.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products matching every condition, in insertion order.
    ///
    /// An empty filter matches every product.
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<ProductRecord>, RepositoryError>;

    /// Up to `limit` products by descending numeric `ratings`.
    ///
    /// Products without a numeric rating sort last; ties keep insertion order.
    async fn top_rated(&self, limit: usize) -> Result<Vec<ProductRecord>, RepositoryError>;

    /// A single product by key.
    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, RepositoryError>;

    /// Insert a document under a freshly assigned key.
    async fn insert(&self, doc: Document) -> Result<InsertAck, RepositoryError>;

    /// Merge `patch` into the stored document.
    async fn update(&self, id: ProductId, patch: Document) -> Result<UpdateAck, RepositoryError>;

    /// Delete a product by key.
    async fn delete(&self, id: ProductId) -> Result<DeleteAck, RepositoryError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// User collection capability.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, RepositoryError>;

    /// Insert an account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    async fn insert(&self, user: NewUser) -> Result<StoredUser, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-index violation to `RepositoryError::Conflict`.
fn conflict_or_database(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
