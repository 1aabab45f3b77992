//! Request tracing spans.

use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

/// Span builder used by [`http_trace_layer`].
pub type MakeHttpSpan = fn(&Request<axum::body::Body>) -> Span;

/// Response hook used by [`http_trace_layer`].
pub type OnHttpResponse = fn(&Response<axum::body::Body>, Duration, &Span);

fn make_span(request: &Request<axum::body::Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

fn on_response(response: &Response<axum::body::Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    DefaultOnResponse::default().on_response(response, latency, span);
}

/// `TraceLayer` whose span declares `request_id`, `status` and `latency_ms`.
#[must_use]
pub fn http_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    MakeHttpSpan,
    tower_http::trace::DefaultOnRequest,
    OnHttpResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeHttpSpan)
        .on_response(on_response as OnHttpResponse)
}
