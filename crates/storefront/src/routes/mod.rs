//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                    - Liveness banner
//! GET    /health              - Health check
//! GET    /health/ready        - Readiness (store ping)
//!
//! # Catalog
//! GET    /all-products        - Every product
//! GET    /flash-sale          - Products with flashSale == true
//! GET    /trending-products   - Top 6 by ratings
//! GET    /products            - Filtered search (category, priceLow/High, ratingsLow/High)
//! POST   /products            - Insert a product
//! GET    /products/{id}       - Product detail (null if absent)
//! PUT    /products/{id}       - Merge fields into a product
//! DELETE /products/{id}       - Delete a product
//!
//! # Auth
//! POST   /register            - Create an account
//! POST   /login               - Exchange credentials for an access token
//! ```

pub mod auth;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/health/ready", get(home::readiness))
        // Catalog listings
        .route("/all-products", get(products::all))
        .route("/flash-sale", get(products::flash_sale))
        .route("/trending-products", get(products::trending))
        .nest("/products", product_routes())
        // Auth
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}
