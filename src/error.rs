//! Unified error types for the profile proxy.

use thiserror::Error;

use crate::profile::LookupStage;

/// Unified error type for service startup and configuration.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Profile lookup error.
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Metrics exporter could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// HTTP client construction error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the two-stage player lookup pipeline.
///
/// None of these reach the caller; the player handler logs them and answers
/// with a plain 404.
#[derive(Error, Debug)]
pub enum LookupError {
    /// Transport-level failure talking to an upstream.
    #[error("{stage} request failed: {source}")]
    Http {
        /// Which upstream call failed.
        stage: LookupStage,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-2xx status.
    #[error("{stage} returned HTTP {status}")]
    UpstreamStatus {
        /// Which upstream call failed.
        stage: LookupStage,
        /// Status code returned.
        status: reqwest::StatusCode,
    },

    /// Upstream body was not the JSON shape we expect.
    #[error("{stage} returned malformed body: {source}")]
    Decode {
        /// Which upstream call failed.
        stage: LookupStage,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Name lookup succeeded but carried no identifier.
    #[error("name lookup response has no id")]
    MissingId,

    /// Profile had an empty properties array.
    #[error("profile {0} has no texture property")]
    MissingProperty(String),

    /// Texture property was not valid base64.
    #[error("texture property is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded texture property was not valid JSON.
    #[error("texture payload is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Texture payload had no SKIN entry.
    #[error("texture payload has no skin")]
    MissingSkin,
}

impl LookupError {
    /// Upstream stage this error belongs to, for metrics labels.
    pub fn stage(&self) -> LookupStage {
        match self {
            LookupError::Http { stage, .. }
            | LookupError::UpstreamStatus { stage, .. }
            | LookupError::Decode { stage, .. } => *stage,
            LookupError::MissingId => LookupStage::NameLookup,
            LookupError::MissingProperty(_)
            | LookupError::Base64(_)
            | LookupError::Json(_)
            | LookupError::MissingSkin => LookupStage::Textures,
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_id_belongs_to_name_lookup() {
        assert_eq!(LookupError::MissingId.stage(), LookupStage::NameLookup);
    }

    #[test]
    fn status_error_message_names_stage() {
        let err = LookupError::UpstreamStatus {
            stage: LookupStage::Profile,
            status: reqwest::StatusCode::NO_CONTENT,
        };
        assert_eq!(err.to_string(), "profile returned HTTP 204 No Content");
    }

    #[test]
    fn lookup_and_io_errors_convert_into_app_error() {
        let err: AppError = LookupError::MissingId.into();
        assert!(matches!(err, AppError::Lookup(LookupError::MissingId)));
        assert_eq!(err.to_string(), "lookup error: name lookup response has no id");

        let err: AppError = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy").into();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn invalid_config_message_carries_reason() {
        let err = AppError::InvalidConfig("PORT is wrong".to_string());
        assert_eq!(err.to_string(), "invalid configuration: PORT is wrong");
    }

    #[test]
    fn payload_errors_belong_to_textures() {
        assert_eq!(LookupError::MissingSkin.stage(), LookupStage::Textures);
        assert_eq!(
            LookupError::MissingProperty("abc".to_string()).stage(),
            LookupStage::Textures
        );
    }
}
