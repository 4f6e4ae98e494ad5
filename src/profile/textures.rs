//! Decoding of the base64 texture property and reshaping into [`PlayerResponse`].

use base64::{engine::general_purpose, Engine as _};

use super::types::{PlayerIdentity, PlayerModel, PlayerResponse, ProfileResponse, TexturePayload};
use crate::error::LookupError;

/// Decode a base64 texture property value into its JSON payload.
pub fn decode_texture_payload(value: &str) -> Result<TexturePayload, LookupError> {
    let bytes = general_purpose::STANDARD.decode(value.trim())?;
    let payload = serde_json::from_slice(&bytes)?;
    Ok(payload)
}

/// Final path segment of a skin URL.
pub fn skin_id(skin_url: &str) -> &str {
    skin_url.rsplit('/').next().unwrap_or(skin_url)
}

/// Build the normalized player payload from the two lookup stages.
pub fn build_player_response(
    identity: &PlayerIdentity,
    profile: &ProfileResponse,
) -> Result<PlayerResponse, LookupError> {
    let property = profile.properties.first().ok_or_else(|| {
        LookupError::MissingProperty(identity.uuid.clone())
    })?;

    let payload = decode_texture_payload(&property.value)?;
    let skin = payload.textures.skin.ok_or(LookupError::MissingSkin)?;

    let player_model = PlayerModel::from_metadata(
        skin.metadata.as_ref().and_then(|m| m.model.as_deref()),
    );

    Ok(PlayerResponse {
        name: payload.profile_name,
        uuid: identity.uuid.clone(),
        skin_id: skin_id(&skin.url).to_string(),
        player_model,
        skin_url: skin.url,
        cape_url: payload.textures.cape.map(|cape| cape.url),
    })
}
