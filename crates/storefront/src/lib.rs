//! Shine Store storefront library.
//!
//! This crate provides the HTTP service as a library, allowing the full
//! router to be driven in-process by tests and reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

use state::AppState;

/// Build the application router with its middleware stack.
///
/// Layers are listed innermost first; Sentry wraps everything so that each
/// request gets its own hub. Trailing slashes are trimmed before routing, so
/// `/products/` is served as `/products`.
pub fn app(state: AppState) -> Router {
    let cors = middleware::cors_layer(&state.config().cors_allowed_origins);

    let routes = routes::routes()
        .layer(cors)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::http_trace_layer())
        .with_state(state);

    Router::new()
        .fallback_service(NormalizePathLayer::trim_trailing_slash().layer(routes))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
