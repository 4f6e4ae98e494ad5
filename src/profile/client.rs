//! Mojang API client: the two-stage name → profile pipeline.

use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{AppError, LookupError};
use crate::metrics;

use super::textures::build_player_response;
use super::types::{
    LookupStage, NameLookupResponse, PlayerIdentity, PlayerResponse, ProfileResponse,
};

/// Client for the name lookup and session profile services.
#[derive(Debug, Clone)]
pub struct MojangClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL of the name to id service.
    api_url: String,
    /// Base URL of the profile by id service.
    session_url: String,
}

impl MojangClient {
    /// Create a new client from config, using the HTTP client's default timeouts.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(
            http,
            &config.mojang_api_url,
            &config.session_server_url,
        ))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_http(http: reqwest::Client, api_url: &str, session_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            session_url: session_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the name to id service.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Base URL of the profile by id service.
    pub fn session_url(&self) -> &str {
        &self.session_url
    }

    /// Run the full pipeline: name → identity → profile → normalized payload.
    #[instrument(skip(self))]
    pub async fn lookup_player(&self, name: &str) -> Result<PlayerResponse, LookupError> {
        let _timer = metrics::timer_player_lookup();

        let identity = self.lookup_identity(name).await?;
        let profile = self.fetch_profile(&identity).await?;
        let player = build_player_response(&identity, &profile)?;

        debug!(uuid = %player.uuid, model = %player.player_model, "Resolved player");
        Ok(player)
    }

    /// Stage one: resolve a player name to its uuid.
    ///
    /// The name is embedded in the request path as given.
    #[instrument(skip(self))]
    pub async fn lookup_identity(&self, name: &str) -> Result<PlayerIdentity, LookupError> {
        let stage = LookupStage::NameLookup;
        let url = format!("{}/users/profiles/minecraft/{}", self.api_url, name);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Http { stage, source })?;

        if !response.status().is_success() {
            return Err(LookupError::UpstreamStatus {
                stage,
                status: response.status(),
            });
        }

        let body: NameLookupResponse = response
            .json()
            .await
            .map_err(|source| LookupError::Decode { stage, source })?;

        let uuid = body.id.filter(|id| !id.is_empty()).ok_or(LookupError::MissingId)?;

        Ok(PlayerIdentity { uuid })
    }

    /// Stage two: fetch the profile for a resolved identity.
    #[instrument(skip(self), fields(uuid = %identity.uuid))]
    pub async fn fetch_profile(
        &self,
        identity: &PlayerIdentity,
    ) -> Result<ProfileResponse, LookupError> {
        let stage = LookupStage::Profile;
        let url = format!(
            "{}/session/minecraft/profile/{}",
            self.session_url, identity.uuid
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| LookupError::Http { stage, source })?;

        if !response.status().is_success() {
            return Err(LookupError::UpstreamStatus {
                stage,
                status: response.status(),
            });
        }

        response
            .json()
            .await
            .map_err(|source| LookupError::Decode { stage, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::mock::{MockMojangServer, MockPlayer};
    use crate::profile::types::PlayerModel;
    use pretty_assertions::assert_eq;
    use tokio_test::{assert_err, assert_ok};

    const NOTCH_UUID: &str = "069a79f444e94726a5befca90e38aaf5";

    #[test]
    fn client_trims_trailing_slashes() {
        let client = MojangClient::with_http(
            reqwest::Client::new(),
            "https://api.mojang.com/",
            "https://sessionserver.mojang.com//",
        );
        assert_eq!(client.api_url(), "https://api.mojang.com");
        assert_eq!(client.session_url(), "https://sessionserver.mojang.com");
    }

    #[test]
    fn client_creation_uses_config_urls() {
        let client = assert_ok!(MojangClient::new(&Config::default()));
        assert_eq!(client.api_url(), "https://api.mojang.com");
        assert_eq!(client.session_url(), "https://sessionserver.mojang.com");
    }

    #[tokio::test]
    async fn lookup_player_resolves_both_stages() {
        let server = MockMojangServer::start(vec![MockPlayer::new("Notch", NOTCH_UUID)])
            .await
            .unwrap();
        let client = MojangClient::new(&server.config()).unwrap();

        let player = assert_ok!(client.lookup_player("Notch").await);

        assert_eq!(player.name, "Notch");
        assert_eq!(player.uuid, NOTCH_UUID);
        assert_eq!(player.player_model, PlayerModel::Wide);
        assert_eq!(player.cape_url, None);
        assert_eq!(server.profile_requests(), 1);
    }

    #[tokio::test]
    async fn unknown_name_fails_without_profile_call() {
        let server = MockMojangServer::start(Vec::new()).await.unwrap();
        let client = MojangClient::new(&server.config()).unwrap();

        let err = assert_err!(client.lookup_player("nobody").await);

        assert!(matches!(
            err,
            LookupError::UpstreamStatus {
                stage: LookupStage::NameLookup,
                ..
            }
        ));
        assert_eq!(server.profile_requests(), 0);
    }

    #[tokio::test]
    async fn missing_id_is_an_error() {
        let server = MockMojangServer::start(vec![MockPlayer::new("Ghost", "unused").omit_id()])
            .await
            .unwrap();
        let client = MojangClient::new(&server.config()).unwrap();

        let err = assert_err!(client.lookup_identity("Ghost").await);
        assert!(matches!(err, LookupError::MissingId));
    }

    #[tokio::test]
    async fn profile_status_error_is_reported_for_profile_stage() {
        let server = MockMojangServer::start(vec![
            MockPlayer::new("Broken", NOTCH_UUID).profile_status(500),
        ])
        .await
        .unwrap();
        let client = MojangClient::new(&server.config()).unwrap();

        let err = assert_err!(client.lookup_player("Broken").await);
        assert_eq!(err.stage(), LookupStage::Profile);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_http_error() {
        let client = MojangClient::with_http(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            "http://127.0.0.1:9",
        );

        let err = assert_err!(client.lookup_identity("Notch").await);
        assert!(matches!(err, LookupError::Http { .. }));
    }
}
