//! Request ID middleware for request tracing and correlation.
//!
//! An `x-request-id` supplied by an upstream proxy is reused when it is a
//! short printable token; otherwise a UUID v4 is generated. The ID is recorded
//! on the `http_request` span, tagged on the Sentry scope and echoed back in
//! the response headers.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upstream IDs longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

fn upstream_id(request: &Request) -> Option<String> {
    let raw = request.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    let usable = !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| raw.to_owned())
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = upstream_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
