//! Upstream record shapes and the normalized player payload.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// The upstream call a lookup failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum LookupStage {
    /// Name to id lookup.
    NameLookup,
    /// Profile by id fetch.
    Profile,
    /// Decoding the embedded texture payload.
    Textures,
}

/// Skin model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerModel {
    /// Classic 4px-arm model.
    #[default]
    Wide,
    /// Slim 3px-arm model.
    Slim,
}

impl PlayerModel {
    /// Model from the optional `metadata.model` flag of a skin texture.
    ///
    /// Only an explicit `slim` selects the slim model.
    pub fn from_metadata(model: Option<&str>) -> Self {
        match model {
            Some("slim") => PlayerModel::Slim,
            _ => PlayerModel::Wide,
        }
    }
}

/// Body of the name to id lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct NameLookupResponse {
    /// Undashed player uuid.
    pub id: Option<String>,
    /// Canonical player name.
    pub name: Option<String>,
}

/// Result of the first lookup stage, input to the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    /// Player uuid as returned by the lookup service.
    pub uuid: String,
}

/// Body of the profile by id fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    /// Player uuid.
    pub id: Option<String>,
    /// Player name.
    pub name: Option<String>,
    /// Signed profile properties; the first one carries the textures.
    #[serde(default)]
    pub properties: Vec<ProfileProperty>,
}

/// Single signed profile property.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileProperty {
    /// Property name (normally `textures`).
    pub name: Option<String>,
    /// Base64-encoded JSON value.
    pub value: String,
    /// Optional Yggdrasil signature.
    pub signature: Option<String>,
}

/// Decoded texture payload embedded in a profile property.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TexturePayload {
    /// Milliseconds since epoch when the payload was generated.
    pub timestamp: Option<i64>,
    /// Player uuid.
    pub profile_id: Option<String>,
    /// Player display name.
    pub profile_name: String,
    /// Texture entries.
    #[serde(default)]
    pub textures: Textures,
}

/// Texture map keyed by texture kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Textures {
    /// Skin texture.
    #[serde(rename = "SKIN")]
    pub skin: Option<SkinTexture>,
    /// Cape texture.
    #[serde(rename = "CAPE")]
    pub cape: Option<CapeTexture>,
}

/// Skin texture entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SkinTexture {
    /// Texture image URL.
    pub url: String,
    /// Optional model metadata.
    pub metadata: Option<SkinMetadata>,
}

/// Skin metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SkinMetadata {
    /// `slim` for the slim model; absent otherwise.
    pub model: Option<String>,
}

/// Cape texture entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CapeTexture {
    /// Texture image URL.
    pub url: String,
}

/// Normalized player payload returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    /// Display name from the texture payload.
    pub name: String,
    /// Uuid from the name lookup.
    pub uuid: String,
    /// Final path segment of the skin URL.
    pub skin_id: String,
    /// Skin model variant.
    pub player_model: PlayerModel,
    /// Skin image URL.
    pub skin_url: String,
    /// Cape image URL, null when the player has no cape.
    pub cape_url: Option<String>,
}
