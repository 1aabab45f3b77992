//! In-process document store.
//!
//! Keeps both collections in insertion-ordered vectors and evaluates
//! filters with [`ProductFilter::matches`]. Used by tests and local runs
//! that do not need persistence.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shine_store_core::{
    DeleteAck, Document, InsertAck, NewUser, ProductFilter, ProductId, ProductRecord, StoredUser,
    UpdateAck, UserId, merge_fields,
};

use super::{ProductStore, RepositoryError, UserStore};

/// Memory-backed implementation of both store capabilities.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<ProductRecord>>,
    users: RwLock<Vec<StoredUser>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Descending by numeric rating, non-numeric ratings last.
fn by_ratings_desc(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    match (a.ratings(), b.ratings()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<ProductRecord>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|p| filter.matches(&p.fields))
            .cloned()
            .collect())
    }

    async fn top_rated(&self, limit: usize) -> Result<Vec<ProductRecord>, RepositoryError> {
        let mut products = self.products.read().await.clone();
        products.sort_by(by_ratings_desc);
        products.truncate(limit);
        Ok(products)
    }

    async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, doc: Document) -> Result<InsertAck, RepositoryError> {
        let id = ProductId::generate();
        self.products.write().await.push(ProductRecord::new(id, doc));
        Ok(InsertAck::new(id))
    }

    async fn update(&self, id: ProductId, patch: Document) -> Result<UpdateAck, RepositoryError> {
        let mut products = self.products.write().await;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(UpdateAck::new(0, 0));
        };

        let modified = merge_fields(&mut product.fields, patch);
        Ok(UpdateAck::new(1, u64::from(modified)))
    }

    async fn delete(&self, id: ProductId) -> Result<DeleteAck, RepositoryError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(DeleteAck::new(u64::from(products.len() < before)))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<StoredUser, RepositoryError> {
        // Check and insert under one write lock, like a unique index.
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let stored = StoredUser {
            id: UserId::generate(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};
    use shine_store_core::{ProductSearch, Role};

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    async fn seeded(docs: Vec<Value>) -> (MemoryStore, Vec<ProductId>) {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for d in docs {
            ids.push(ProductStore::insert(&store, doc(d)).await.unwrap().inserted_id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let (store, ids) = seeded(vec![
            json!({"name": "a", "price": 5}),
            json!({"name": "b", "price": 50}),
            json!({"name": "c", "price": 15}),
        ])
        .await;

        let all = store.find(&ProductFilter::all()).await.unwrap();
        let found: Vec<_> = all.iter().map(|p| p.id).collect();
        assert_eq!(found, ids);
    }

    #[tokio::test]
    async fn test_find_applies_filter() {
        let (store, _) = seeded(vec![
            json!({"name": "a", "price": 5, "ratings": 4}),
            json!({"name": "b", "price": 50, "ratings": 5}),
            json!({"name": "c", "price": 15, "ratings": 2}),
        ])
        .await;

        let filter = ProductFilter::from_search(&ProductSearch {
            price_low: Some("1".to_string()),
            price_high: Some("20".to_string()),
            ratings_low: Some("3".to_string()),
            ..ProductSearch::default()
        });
        let found = store.find(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().unwrap().fields["name"], json!("a"));
    }

    #[tokio::test]
    async fn test_top_rated_sorts_and_limits() {
        let (store, ids) = seeded(vec![
            json!({"ratings": 3}),
            json!({"name": "unrated"}),
            json!({"ratings": 5}),
            json!({"ratings": 4.5}),
            json!({"ratings": 5}),
        ])
        .await;

        let top = store.top_rated(3).await.unwrap();
        let order: Vec<_> = top.iter().map(|p| p.id).collect();
        assert_eq!(order, vec![ids[2], ids[4], ids[3]]);

        let everything = store.top_rated(10).await.unwrap();
        assert_eq!(everything.last().unwrap().id, ids[1]);
    }

    #[tokio::test]
    async fn test_update_reports_matched_and_modified() {
        let (store, ids) = seeded(vec![json!({"name": "a", "price": 5})]).await;
        let id = ids[0];

        let ack = store.update(id, doc(json!({"price": 5}))).await.unwrap();
        assert_eq!((ack.matched_count, ack.modified_count), (1, 0));

        let ack = store.update(id, doc(json!({"price": 7}))).await.unwrap();
        assert_eq!((ack.matched_count, ack.modified_count), (1, 1));
        assert_eq!(store.get(id).await.unwrap().unwrap().fields["price"], json!(7));

        let ack = store
            .update(ProductId::generate(), doc(json!({"price": 7})))
            .await
            .unwrap();
        assert_eq!((ack.matched_count, ack.modified_count), (0, 0));
    }

    #[tokio::test]
    async fn test_delete_counts_removed() {
        let (store, ids) = seeded(vec![json!({"name": "a"})]).await;

        assert_eq!(store.delete(ids[0]).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete(ids[0]).await.unwrap().deleted_count, 0);
        assert!(store.get(ids[0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let store = MemoryStore::new();
        let new_user = |name: &str| NewUser {
            username: name.to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
        };

        UserStore::insert(&store, new_user("ada")).await.unwrap();
        let err = UserStore::insert(&store, new_user("imposter")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let stored = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.username, "ada");
    }
}
