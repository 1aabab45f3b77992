//! Product catalog service.
//!
//! Thin layer over [`ProductStore`] that owns the listing policies: the
//! flash-sale filter, the trending cut-off and the query-builder
//! short-circuit for searches with no usable conditions.

use std::sync::Arc;

use tracing::debug;

use shine_store_core::{
    DeleteAck, Document, InsertAck, ProductFilter, ProductId, ProductRecord, ProductSearch,
    UpdateAck,
};

use crate::db::{ProductStore, RepositoryError};

/// Number of products returned by [`CatalogService::trending`].
pub const TRENDING_LIMIT: usize = 6;

/// Catalog operations backed by a product store.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<dyn ProductStore>,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Every product, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn all(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        self.products.find(&ProductFilter::all()).await
    }

    /// Products with `flashSale == true`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn flash_sale(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        self.products.find(&ProductFilter::flash_sale()).await
    }

    /// The [`TRENDING_LIMIT`] highest-rated products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn trending(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        self.products.top_rated(TRENDING_LIMIT).await
    }

    /// Run a filtered search.
    ///
    /// A search that yields no usable condition returns an empty list
    /// without touching the store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn search(
        &self,
        search: &ProductSearch,
    ) -> Result<Vec<ProductRecord>, RepositoryError> {
        let filter = ProductFilter::from_search(search);
        debug!(?filter, "Built product filter");

        if filter.is_empty() {
            return Ok(Vec::new());
        }

        self.products.find(&filter).await
    }

    /// A single product, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        self.products.get(id).await
    }

    /// Insert a product document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn create(&self, doc: Document) -> Result<InsertAck, RepositoryError> {
        let ack = self.products.insert(doc).await?;
        debug!(product_id = %ack.inserted_id, "Product created");
        Ok(ack)
    }

    /// Merge `patch` into an existing product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn update(
        &self,
        id: ProductId,
        patch: Document,
    ) -> Result<UpdateAck, RepositoryError> {
        self.products.update(id, patch).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn delete(&self, id: ProductId) -> Result<DeleteAck, RepositoryError> {
        self.products.delete(id).await
    }

    /// Check that the product store is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be reached.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        self.products.ping().await
    }
}
