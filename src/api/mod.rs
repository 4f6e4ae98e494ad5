//! HTTP API module: origin gate, routing, and resource handlers.

pub mod cors;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, Route};
