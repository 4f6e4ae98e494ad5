//! Integration tests for the profile proxy.
//!
//! Most tests run the full service on a local TCP listener against a mock
//! upstream. The tests marked `#[ignore]` talk to the real Mojang API.
//! Run those with: cargo test --test integration -- --ignored

use std::net::SocketAddr;

use mc_inspect_api::api::{create_router, AppState};
use mc_inspect_api::config::Config;
use mc_inspect_api::profile::{MockMojangServer, MockPlayer, MojangClient, PlayerModel};
use pretty_assertions::assert_eq;
use reqwest::header;
use tokio::net::TcpListener;

const ORIGIN: &str = "http://localhost:3000";
const NOTCH_UUID: &str = "069a79f444e94726a5befca90e38aaf5";

/// Serve the proxy on an ephemeral port, returning its address.
async fn spawn_service(config: Config) -> SocketAddr {
    let router = create_router(AppState::new(config).unwrap());
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// Notch scenario: no cape, default model, over a real socket.
#[tokio::test]
async fn test_player_lookup_over_tcp() {
    let upstream = MockMojangServer::start(vec![MockPlayer::new("Notch", NOTCH_UUID)])
        .await
        .unwrap();
    let addr = spawn_service(upstream.config()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/players/Notch"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["uuid"], NOTCH_UUID);
    assert_eq!(body["playerModel"], "wide");
    assert!(body["capeUrl"].is_null());
}

/// Unknown players answer 404 without leaking the upstream error text.
#[tokio::test]
async fn test_unknown_player_does_not_leak_upstream_error() {
    let upstream = MockMojangServer::start(Vec::new()).await.unwrap();
    let addr = spawn_service(upstream.config()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/players/nobody_here"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body = response.text().await.unwrap();
    assert_eq!(body, "Not Found");
    assert!(!body.contains("Couldn't find"));
    assert_eq!(upstream.profile_requests(), 0);
}

/// Requests from other origins are refused before any routing.
#[tokio::test]
async fn test_forbidden_origin_over_tcp() {
    let upstream = MockMojangServer::start(vec![MockPlayer::new("Notch", NOTCH_UUID)])
        .await
        .unwrap();
    let addr = spawn_service(upstream.config()).await;

    let response = reqwest::Client::new()
        .get(format!("http://{addr}/players/Notch"))
        .header(header::ORIGIN, "https://somewhere.else")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
    assert_eq!(response.text().await.unwrap(), "Forbidden");
    assert_eq!(upstream.profile_requests(), 0);
}

/// A configured allow-list replaces the defaults.
#[tokio::test]
async fn test_custom_allow_list() {
    let config = Config {
        allowed_origins: vec!["https://inspect.example".to_string()],
        ..Config::default()
    };
    let addr = spawn_service(config).await;
    let client = reqwest::Client::new();

    let allowed = client
        .get(format!("http://{addr}/servers/hub"))
        .header(header::ORIGIN, "https://inspect.example")
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status(), reqwest::StatusCode::OK);
    assert_eq!(allowed.text().await.unwrap(), "Server: hub");

    let default_origin = client
        .get(format!("http://{addr}/servers/hub"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();
    assert_eq!(default_origin.status(), reqwest::StatusCode::FORBIDDEN);
}

/// Test that a real player resolves against the live Mojang API.
#[tokio::test]
#[ignore = "requires network access to the Mojang API"]
async fn test_live_lookup_notch() {
    let client = MojangClient::new(&Config::default()).unwrap();

    let result = client.lookup_player("Notch").await;
    assert!(result.is_ok(), "Failed to look up Notch: {:?}", result.err());

    let player = result.unwrap();
    assert_eq!(player.uuid, NOTCH_UUID);
    assert_eq!(player.name, "Notch");
    assert_eq!(player.player_model, PlayerModel::Wide);
    assert!(player.skin_url.ends_with(&player.skin_id));

    println!("Resolved: {:?}", player);
}

/// Test that an unregistered name fails at the name lookup stage.
#[tokio::test]
#[ignore = "requires network access to the Mojang API"]
async fn test_live_lookup_unknown_name() {
    let client = MojangClient::new(&Config::default()).unwrap();

    let result = client.lookup_player("this_name_is_too_long_to_exist").await;
    assert!(result.is_err());
}
