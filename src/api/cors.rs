//! Origin allow-list gate and CORS headers.
//!
//! Runs before routing: rejects unknown origins, answers preflights, rejects
//! methods other than GET, and stamps CORS headers on everything else. The
//! caller's origin lives only in this request's scope and is passed by value
//! to the header builder.

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::handlers::{plain_text, AppState};
use crate::metrics::{self, outcome};

/// Methods advertised to allowed origins.
pub const ALLOW_METHODS: &str = "GET, OPTIONS";
/// Request headers advertised to allowed origins.
pub const ALLOW_HEADERS: &str = "Content-Type";
/// Preflight cache duration in seconds.
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Insert the three CORS headers for an allowed origin.
pub fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Origin if present and on the allow-list.
fn allowed_origin(state: &AppState, headers: &HeaderMap) -> Option<HeaderValue> {
    let origin = headers.get(ORIGIN)?;
    let value = origin.to_str().ok()?;
    state.config.is_allowed_origin(value).then(|| origin.clone())
}

/// 403 without any CORS headers.
pub fn forbidden() -> Response {
    plain_text(StatusCode::FORBIDDEN, "Forbidden")
}

/// Empty 200 carrying the preflight headers.
pub fn preflight(origin: HeaderValue) -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    apply_cors_headers(headers, origin);
    headers.insert(
        ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    response
}

/// Origin check, then method check, then the routed handler.
pub async fn origin_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(origin) = allowed_origin(&state, request.headers()) else {
        debug!(
            origin = ?request.headers().get(ORIGIN),
            path = %request.uri().path(),
            "Rejected origin"
        );
        metrics::inc_requests(outcome::FORBIDDEN);
        return forbidden();
    };

    if request.method() == Method::OPTIONS {
        metrics::inc_requests(outcome::PREFLIGHT);
        return preflight(origin);
    }

    let mut response = if request.method() == Method::GET {
        next.run(request).await
    } else {
        metrics::inc_requests(outcome::METHOD_NOT_ALLOWED);
        plain_text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    };

    apply_cors_headers(response.headers_mut(), origin);
    response
}
