//! Mock Mojang services for testing.
//!
//! Serves canned name lookup and profile responses from a local axum server on
//! an ephemeral port, so the real client and router can be exercised without
//! touching the network.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::Config;

/// Default skin texture used by mock players.
pub const MOCK_SKIN_URL: &str =
    "http://textures.minecraft.net/texture/292009a4925b58f02c77dadc3ecef07ea4c7472f64e0fdc32ce5522489362680";

/// Canned player served by [`MockMojangServer`].
#[derive(Debug, Clone)]
pub struct MockPlayer {
    /// Canonical name; lookups match it case-insensitively.
    pub name: String,
    /// Uuid returned by the name lookup.
    pub uuid: String,
    /// Drop the `id` field from the name lookup body.
    pub omit_id: bool,
    /// Status code of the profile endpoint.
    pub profile_status: u16,
    /// Skin URL, `None` for a payload without SKIN.
    pub skin_url: Option<String>,
    /// Cape URL.
    pub cape_url: Option<String>,
    /// Mark the skin as slim.
    pub slim: bool,
    /// Raw texture property value, replacing the generated one.
    pub raw_property: Option<String>,
}

impl MockPlayer {
    /// Player with a wide skin and no cape.
    pub fn new(name: &str, uuid: &str) -> Self {
        Self {
            name: name.to_string(),
            uuid: uuid.to_string(),
            omit_id: false,
            profile_status: 200,
            skin_url: Some(MOCK_SKIN_URL.to_string()),
            cape_url: None,
            slim: false,
            raw_property: None,
        }
    }

    /// Mark the skin as slim.
    pub fn slim(mut self) -> Self {
        self.slim = true;
        self
    }

    /// Give the player a cape.
    pub fn with_cape(mut self, url: &str) -> Self {
        self.cape_url = Some(url.to_string());
        self
    }

    /// Drop SKIN from the texture payload.
    pub fn without_skin(mut self) -> Self {
        self.skin_url = None;
        self
    }

    /// Drop `id` from the name lookup body.
    pub fn omit_id(mut self) -> Self {
        self.omit_id = true;
        self
    }

    /// Answer the profile endpoint with this status.
    pub fn profile_status(mut self, status: u16) -> Self {
        self.profile_status = status;
        self
    }

    /// Serve this raw string as the texture property value.
    pub fn raw_property(mut self, value: &str) -> Self {
        self.raw_property = Some(value.to_string());
        self
    }

    /// Base64 texture property value for this player.
    pub fn texture_property(&self) -> String {
        if let Some(raw) = &self.raw_property {
            return raw.clone();
        }

        let mut textures = serde_json::Map::new();
        if let Some(skin_url) = &self.skin_url {
            let skin = if self.slim {
                json!({ "url": skin_url, "metadata": { "model": "slim" } })
            } else {
                json!({ "url": skin_url })
            };
            textures.insert("SKIN".to_string(), skin);
        }
        if let Some(cape_url) = &self.cape_url {
            textures.insert("CAPE".to_string(), json!({ "url": cape_url }));
        }

        let payload = json!({
            "timestamp": 1_700_000_000_000_i64,
            "profileId": self.uuid,
            "profileName": self.name,
            "textures": textures,
        });

        general_purpose::STANDARD.encode(payload.to_string())
    }
}

#[derive(Debug, Default)]
struct MockState {
    by_name: HashMap<String, MockPlayer>,
    by_uuid: HashMap<String, MockPlayer>,
    profile_requests: AtomicUsize,
}

/// Local stand-in for the name lookup and session profile services.
#[derive(Debug)]
pub struct MockMojangServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockMojangServer {
    /// Start serving the given players on 127.0.0.1 with an ephemeral port.
    pub async fn start(players: Vec<MockPlayer>) -> std::io::Result<Self> {
        let mut state = MockState::default();
        for player in players {
            state
                .by_uuid
                .insert(player.uuid.clone(), player.clone());
            state.by_name.insert(player.name.to_lowercase(), player);
        }
        let state = Arc::new(state);

        let router = Router::new()
            .route("/users/profiles/minecraft/:name", get(name_lookup))
            .route("/session/minecraft/profile/:uuid", get(profile))
            .with_state(state.clone());

        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL serving both upstream APIs.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Default config with both upstreams pointed at this server.
    pub fn config(&self) -> Config {
        Config {
            mojang_api_url: self.base_url(),
            session_server_url: self.base_url(),
            ..Config::default()
        }
    }

    /// Number of profile requests served so far.
    pub fn profile_requests(&self) -> usize {
        self.state.profile_requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockMojangServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn name_lookup(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    match state.by_name.get(&name.to_lowercase()) {
        Some(player) if player.omit_id => Json(json!({ "name": player.name })).into_response(),
        Some(player) => Json(json!({ "id": player.uuid, "name": player.name })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "path": format!("/users/profiles/minecraft/{name}"),
                "errorMessage": format!("Couldn't find any profile with name {name}"),
            })),
        )
            .into_response(),
    }
}

async fn profile(State(state): State<Arc<MockState>>, Path(uuid): Path<String>) -> Response {
    state.profile_requests.fetch_add(1, Ordering::SeqCst);

    let Some(player) = state.by_uuid.get(&uuid) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    let status = StatusCode::from_u16(player.profile_status).unwrap_or(StatusCode::OK);
    if !status.is_success() {
        return (status, "upstream unavailable").into_response();
    }

    Json(json!({
        "id": player.uuid,
        "name": player.name,
        "properties": [{
            "name": "textures",
            "value": player.texture_property(),
        }],
    }))
    .into_response()
}
