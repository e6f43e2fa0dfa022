// ABOUTME: HTTP server crate for conclave, exposing routing and generation over a JSON API.
// ABOUTME: Assembles Axum routes around a shared LLM client and generator configuration.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ServerConfig};
pub use routes::create_router;
