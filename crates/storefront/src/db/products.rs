//! `PostgreSQL`-backed product collection.
//!
//! Documents live in `products.doc` (`JSONB`). Filter conditions are compiled
//! to parameterized SQL; field names come from [`ProductField`] and are never
//! taken from request input.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use shine_store_core::{
    Condition, DeleteAck, Document, InsertAck, ProductField, ProductFilter, ProductId,
    ProductRecord, UpdateAck, merge_fields, strip_key,
};

use super::{ProductStore, RepositoryError};

#[derive(FromRow)]
struct ProductRow {
    id: ProductId,
    doc: Json<Document>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        Self::new(row.id, row.doc.0)
    }
}

/// Product store over a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Create a new product store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SQL expression reading a field as `float8`, or `NULL` when it is not a JSON number.
fn numeric_expr(field: ProductField) -> String {
    let name = field.as_str();
    format!("(CASE WHEN jsonb_typeof(doc -> '{name}') = 'number' THEN (doc ->> '{name}')::float8 END)")
}

/// Append `WHERE ... AND ...` for every condition of the filter.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    for (i, condition) in filter.conditions().iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });

        match condition {
            Condition::Equals { field, value } => {
                let name = field.as_str();
                qb.push(format!("(doc -> '{name}' = "))
                    .push_bind(Json(value.clone()))
                    .push(format!(
                        " OR (jsonb_typeof(doc -> '{name}') = 'array' AND doc -> '{name}' @> jsonb_build_array("
                    ))
                    .push_bind(Json(value.clone()))
                    .push(")))");
            }
            Condition::Range { field, range } => {
                let expr = numeric_expr(*field);
                qb.push("(");
                qb.push(format!("{expr} IS NOT NULL"));
                if let Some(low) = range.low() {
                    qb.push(format!(" AND {expr} >= ")).push_bind(low);
                }
                if let Some(high) = range.high() {
                    qb.push(format!(" AND {expr} <= ")).push_bind(high);
                }
                qb.push(")");
            }
        }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<ProductRecord>, RepositoryError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id, doc FROM products");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY seq");

        let rows = qb
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<ProductRecord>, RepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| RepositoryError::DataCorruption(format!("limit out of range: {limit}")))?;

        let sql = format!(
            "SELECT id, doc FROM products ORDER BY {} DESC NULLS LAST, seq LIMIT $1",
            numeric_expr(ProductField::Ratings)
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT id, doc FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProductRecord::from))
    }

    async fn insert(&self, doc: Document) -> Result<InsertAck, RepositoryError> {
        let id: ProductId =
            sqlx::query_scalar("INSERT INTO products (doc) VALUES ($1) RETURNING id")
                .bind(Json(strip_key(doc)))
                .fetch_one(&self.pool)
                .await?;

        Ok(InsertAck::new(id))
    }

    async fn update(&self, id: ProductId, patch: Document) -> Result<UpdateAck, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<Json<Document>> =
            sqlx::query_scalar("SELECT doc FROM products WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(Json(mut doc)) = current else {
            return Ok(UpdateAck::new(0, 0));
        };

        if !merge_fields(&mut doc, patch) {
            return Ok(UpdateAck::new(1, 0));
        }

        sqlx::query("UPDATE products SET doc = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(doc))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(UpdateAck::new(1, 1))
    }

    async fn delete(&self, id: ProductId) -> Result<DeleteAck, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(DeleteAck::new(result.rows_affected()))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
