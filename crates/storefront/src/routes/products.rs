//! Product route handlers.
//!
//! Listings and documents are returned as raw JSON with the key exposed as
//! `_id`. Unexpected failures respond with a fixed per-endpoint message.

use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::instrument;

use shine_store_core::{
    DeleteAck, Document, InsertAck, ProductId, ProductRecord, ProductSearch, UpdateAck,
};

use crate::error::{Result, ResultExt, add_breadcrumb};
use crate::state::AppState;

/// List every product.
#[instrument(skip(state))]
pub async fn all(State(state): State<AppState>) -> Result<Json<Vec<ProductRecord>>> {
    let products = state
        .catalog()
        .all()
        .await
        .or_internal("Error fetching all products")?;
    Ok(Json(products))
}

/// List products on flash sale.
#[instrument(skip(state))]
pub async fn flash_sale(State(state): State<AppState>) -> Result<Json<Vec<ProductRecord>>> {
    let products = state
        .catalog()
        .flash_sale()
        .await
        .or_internal("Error fetching flash sale products")?;
    Ok(Json(products))
}

/// List the highest-rated products.
#[instrument(skip(state))]
pub async fn trending(State(state): State<AppState>) -> Result<Json<Vec<ProductRecord>>> {
    let products = state
        .catalog()
        .trending()
        .await
        .or_internal("Error fetching trending products")?;
    Ok(Json(products))
}

/// Search products by category, price range and ratings range.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ProductRecord>>> {
    let search = search_from_query(query.as_deref());
    let products = state
        .catalog()
        .search(&search)
        .await
        .or_internal("Error fetching products")?;
    Ok(Json(products))
}

/// Fetch a single product. Responds with `null` when it does not exist.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<ProductRecord>>> {
    const CONTEXT: &str = "Error fetching product";

    let id: ProductId = id.parse().or_internal(CONTEXT)?;
    let product = state.catalog().get(id).await.or_internal(CONTEXT)?;
    Ok(Json(product))
}

/// Insert a product document.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    body: std::result::Result<Json<Document>, JsonRejection>,
) -> Result<(StatusCode, Json<InsertAck>)> {
    const CONTEXT: &str = "Error creating product";

    let Json(doc) = body.or_internal(CONTEXT)?;
    let ack = state.catalog().create(doc).await.or_internal(CONTEXT)?;

    let product_id = ack.inserted_id.to_string();
    add_breadcrumb("catalog", "Product created", Some(&[("product_id", product_id.as_str())]));
    Ok((StatusCode::CREATED, Json(ack)))
}

/// Merge fields into an existing product.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<Document>, JsonRejection>,
) -> Result<Json<UpdateAck>> {
    const CONTEXT: &str = "Error updating product";

    let id: ProductId = id.parse().or_internal(CONTEXT)?;
    let Json(patch) = body.or_internal(CONTEXT)?;
    let ack = state.catalog().update(id, patch).await.or_internal(CONTEXT)?;
    Ok(Json(ack))
}

/// Delete a product.
#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>> {
    const CONTEXT: &str = "Error deleting product";

    let id: ProductId = id.parse().or_internal(CONTEXT)?;
    let ack = state.catalog().delete(id).await.or_internal(CONTEXT)?;

    if ack.deleted_count > 0 {
        let product_id = id.to_string();
        add_breadcrumb("catalog", "Product deleted", Some(&[("product_id", product_id.as_str())]));
    }
    Ok(Json(ack))
}

/// Build search parameters from a raw query string.
///
/// The first occurrence of a repeated key wins and unknown keys are ignored,
/// so no query string can fail extraction.
fn search_from_query(raw: Option<&str>) -> ProductSearch {
    let mut search = ProductSearch::default();

    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        let slot = match key.as_ref() {
            "category" => &mut search.category,
            "priceLow" => &mut search.price_low,
            "priceHigh" => &mut search.price_high,
            "ratingsLow" => &mut search.ratings_low,
            "ratingsHigh" => &mut search.ratings_high,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    search
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_from_query_keeps_first_value() {
        let search = search_from_query(Some("priceLow=10&priceLow=20&category=desk&category=lamp"));
        assert_eq!(search.price_low.as_deref(), Some("10"));
        assert_eq!(search.category.as_deref(), Some("desk"));
    }

    #[test]
    fn test_search_from_query_decodes_and_ignores_unknown_keys() {
        let search = search_from_query(Some("category=home+office&ratingsHigh=4%2E5&sort=asc"));
        assert_eq!(
            search,
            ProductSearch {
                category: Some("home office".to_owned()),
                ratings_high: Some("4.5".to_owned()),
                ..ProductSearch::default()
            }
        );
    }

    #[test]
    fn test_search_from_missing_query_is_empty() {
        assert_eq!(search_from_query(None), ProductSearch::default());
    }
}
