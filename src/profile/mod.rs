//! Player profile module for Mojang lookups.
//!
//! This module handles:
//! - Upstream record types and the normalized player payload
//! - The two-stage lookup client (name → uuid → profile)
//! - Decoding of the base64 texture property
//! - Mock upstream server for testing

pub mod client;
pub mod mock;
pub mod textures;
pub mod types;

pub use client::MojangClient;
pub use mock::{MockMojangServer, MockPlayer};
pub use textures::{build_player_response, decode_texture_payload};
pub use types::{LookupStage, PlayerIdentity, PlayerModel, PlayerResponse};
