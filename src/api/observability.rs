//! Request tracing, HTTP metrics and response hardening.

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Level, info_span};
use uuid::Uuid;

use super::AppState;

const SECURITY_HEADERS: [(HeaderName, &str); 4] = [
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
    (header::CACHE_CONTROL, "no-store"),
];

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.prometheus_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::OK, "# metrics recorder disabled\n").into_response(),
    }
}

/// Wraps each request in a span carrying a fresh request id, the matched
/// route and whether a bearer credential was presented. Handlers fill in
/// `user_id` once a token or login resolves to an account.
pub async fn request_tracing_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();

    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_owned(),
        |matched| matched.as_str().to_owned(),
    );
    let method = req.method().clone();
    let bearer_present = req.headers().contains_key(header::AUTHORIZATION);

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        %method,
        %route,
        bearer_present,
        user_id = tracing::field::Empty,
    );

    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status();
    let elapsed = started.elapsed();
    let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    let labels = [
        ("method", method.to_string()),
        ("route", route),
        ("status", status.as_u16().to_string()),
    ];
    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(elapsed.as_secs_f64());

    span.in_scope(|| {
        let level = log_level_for(status);
        if level == Level::ERROR {
            tracing::error!(status = status.as_u16(), elapsed_ms, "Request failed");
        } else if level == Level::WARN {
            tracing::warn!(status = status.as_u16(), elapsed_ms, "Request rejected");
        } else {
            tracing::info!(status = status.as_u16(), elapsed_ms, "Request finished");
        }
    });

    response
}

/// Client errors log at warn, server errors at error.
fn log_level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }

    response
}
