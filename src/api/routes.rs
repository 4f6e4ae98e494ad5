//! HTTP API route definitions.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use super::cors::origin_gate;
use super::handlers::{dispatch, AppState};

/// Resource addressed by a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/players/{name}`
    Player(&'a str),
    /// `/servers/{id}`
    Server(&'a str),
    /// Anything else, including every path without exactly two segments.
    NotFound,
}

impl<'a> Route<'a> {
    /// Parse a raw (not percent-decoded) path.
    ///
    /// Empty segments are dropped, so `/players/foo/` and `//players/foo`
    /// resolve like `/players/foo`.
    pub fn parse(path: &'a str) -> Self {
        let segments: Vec<&'a str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            &["players", name] => Route::Player(name),
            &["servers", id] => Route::Server(id),
            _ => Route::NotFound,
        }
    }
}

/// Create the API router.
///
/// Every path goes through the origin gate; routing itself happens in
/// [`dispatch`] so the two-segment rule applies uniformly.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(middleware::from_fn_with_state(state.clone(), origin_gate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
