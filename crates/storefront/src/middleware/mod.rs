//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transactions)
//! 2. `TraceLayer` (request span with method, uri, status, latency)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. CORS

pub mod cors;
pub mod request_id;
pub mod trace;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use trace::http_trace_layer;
