//! Application configuration loaded from environment variables.

use std::net::IpAddr;

use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Access Control ===
    /// Origins allowed to call the API (comma-separated in the environment).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    // === Upstreams ===
    /// Base URL of the name to id lookup service.
    #[serde(default = "default_mojang_api_url")]
    pub mojang_api_url: String,

    /// Base URL of the profile by id service.
    #[serde(default = "default_session_server_url")]
    pub session_server_url: String,

    // === Server Configuration ===
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Metrics ===
    /// Run the Prometheus exporter.
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Port for the Prometheus exporter.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "https://mc-inspect.pages.dev".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

fn default_mojang_api_url() -> String {
    "https://api.mojang.com".to_string()
}

fn default_session_server_url() -> String {
    "https://sessionserver.mojang.com".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for Config {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            mojang_api_url: default_mojang_api_url(),
            session_server_url: default_session_server_url(),
            bind_address: default_bind_address(),
            port: default_port(),
            metrics_enabled: false,
            metrics_port: default_metrics_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config: Config = envy::from_env()?;
        config.normalize();
        Ok(config)
    }

    /// Trim whitespace from origins and trailing slashes from base URLs.
    pub fn normalize(&mut self) {
        for origin in &mut self.allowed_origins {
            *origin = origin.trim().to_string();
        }
        self.mojang_api_url = self.mojang_api_url.trim_end_matches('/').to_string();
        self.session_server_url = self.session_server_url.trim_end_matches('/').to_string();
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.allowed_origins.is_empty() {
            return Err(invalid("ALLOWED_ORIGINS must list at least one origin"));
        }

        for origin in &self.allowed_origins {
            if origin.is_empty() {
                return Err(invalid("ALLOWED_ORIGINS contains an empty entry"));
            }
            // Matching is exact, a wildcard would never match anything.
            if origin.contains('*') {
                return Err(invalid(format!(
                    "ALLOWED_ORIGINS entry {origin} contains a wildcard"
                )));
            }
        }

        self.bind_ip()?;
        validate_base_url("MOJANG_API_URL", &self.mojang_api_url)?;
        validate_base_url("SESSION_SERVER_URL", &self.session_server_url)?;

        Ok(())
    }

    /// Parsed `BIND_ADDRESS`.
    pub fn bind_ip(&self) -> Result<IpAddr> {
        self.bind_address
            .parse()
            .map_err(|e| invalid(format!("BIND_ADDRESS {} is invalid: {e}", self.bind_address)))
    }

    /// Check whether an origin is on the allow-list (exact, case-sensitive).
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

fn invalid(reason: impl Into<String>) -> AppError {
    AppError::InvalidConfig(reason.into())
}

fn validate_base_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| invalid(format!("{name} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("{name} must use http or https, got {other}"))),
    }
}
