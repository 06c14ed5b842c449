//! Model Host Server
//!
//! Thin HTTP transport over the model registry and prediction dispatcher.
//! The load phase runs while [`AppState`] is built, before the router exists,
//! so the server never accepts a request against a partially loaded registry.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use config::{Environment, ServerConfig};
pub use routes::create_router;
pub use state::AppState;
