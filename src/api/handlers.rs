//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use super::routes::Route;
use crate::config::Config;
use crate::error::AppError;
use crate::metrics::{self, outcome};
use crate::profile::MojangClient;

/// Cache directive for player payloads.
pub const PLAYER_CACHE_CONTROL: &str = "public, max-age=86400";
/// Cache directive for server responses.
pub const SERVER_CACHE_CONTROL: &str = "public, max-age=600";

/// Application state shared with handlers.
///
/// Read-only after startup; nothing request-specific is stored here.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration (allow-list, upstream URLs).
    pub config: Arc<Config>,
    /// Upstream client.
    pub client: MojangClient,
}

impl AppState {
    /// Create new app state, building the upstream client from config.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = MojangClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Create app state around an existing client.
    pub fn with_client(config: Config, client: MojangClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }
}

/// Plain-text response with the given status.
pub fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (status, [(CONTENT_TYPE, "text/plain")], body).into_response()
}

/// Dispatch a GET by path to its resource handler.
pub async fn dispatch(State(state): State<AppState>, uri: Uri) -> Response {
    match Route::parse(uri.path()) {
        Route::Player(name) => player(&state, name).await,
        Route::Server(id) => server(id),
        Route::NotFound => not_found(),
    }
}

/// 404 shared by unknown routes and failed player lookups.
pub fn not_found() -> Response {
    metrics::inc_requests(outcome::NOT_FOUND);
    plain_text(StatusCode::NOT_FOUND, "Not Found")
}

/// Player handler - resolves the name upstream, 404 on any failure.
pub async fn player(state: &AppState, name: &str) -> Response {
    match state.client.lookup_player(name).await {
        Ok(player) => {
            metrics::inc_requests(outcome::PLAYER);
            (
                StatusCode::OK,
                [(CACHE_CONTROL, PLAYER_CACHE_CONTROL)],
                Json(player),
            )
                .into_response()
        }
        Err(e) => {
            warn!(player = %name, stage = %e.stage(), error = %e, "Player lookup failed");
            metrics::inc_upstream_failures(e.stage());
            not_found()
        }
    }
}

/// Server handler - stub echoing the identifier.
pub fn server(id: &str) -> Response {
    metrics::inc_requests(outcome::SERVER);
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/plain"),
            (CACHE_CONTROL, SERVER_CACHE_CONTROL),
        ],
        format!("Server: {id}"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn server_stub_echoes_identifier() {
        let response = server("mc.hypixel.net");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=600");
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Server: mc.hypixel.net");
    }

    #[tokio::test]
    async fn not_found_has_no_cache_directive() {
        let response = not_found();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(CACHE_CONTROL).is_none());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Not Found");
    }

    #[test]
    fn app_state_builds_from_default_config() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(state.config.allowed_origins.len(), 2);
        assert_eq!(state.client.api_url(), "https://api.mojang.com");
    }
}
