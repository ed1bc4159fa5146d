//! HTTP API module for modhub.
//!
//! Exposes `/setup`, `/upload`, `/metadata` and `/download/:id` over axum,
//! plus a health check and OpenAPI docs.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
