//! Origin-gated HTTP proxy for Minecraft player profile lookups.
//!
//! Every request runs through four stages in order:
//!
//! ```text
//! origin check → method check → path routing → resource handler
//! ```
//!
//! `GET /players/{name}` resolves the name against the Mojang API in two
//! sequential calls (name → uuid, uuid → profile), decodes the base64 texture
//! property and answers with a small JSON object. `GET /servers/{id}` is a
//! stub. Any upstream failure is logged and answered with a plain 404.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`profile`]: Mojang client, texture decoding, and test mocks
//! - [`api`]: Origin gate, router, and handlers
//! - [`metrics`]: Prometheus counters and latency histograms
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod profile;
pub mod utils;

pub use config::Config;
pub use error::{AppError, LookupError, Result};
