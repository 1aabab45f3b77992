//! User repository for database operations.
//!
//! Email uniqueness is enforced by the `users_email_key` unique index, so a
//! duplicate registration surfaces as `RepositoryError::Conflict` from a
//! single atomic insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use shine_store_core::{NewUser, Role, StoredUser, UserId};

use super::{RepositoryError, UserStore, conflict_or_database};

#[derive(FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for StoredUser {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid role in database: {e}")))?;

        Ok(Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

/// User store over a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoredUser::try_from).transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<StoredUser, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, role, created_at
            ",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_or_database(e, "email"))?;

        StoredUser::try_from(row)
    }
}
