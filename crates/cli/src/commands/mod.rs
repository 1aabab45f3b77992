//! Subcommand implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Errors shared by commands that talk to the database.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] shine_store_storefront::db::RepositoryError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file: {0}")]
    InvalidSeed(String),
}

/// Database URL from `SHINE_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("SHINE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("SHINE_DATABASE_URL"))
}
