//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: backend selection, seeding and the shared `AppServices`
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and their mapping to service inputs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config)?);
    Ok(router(services))
}

/// Router over already-built services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_logging)))
}
