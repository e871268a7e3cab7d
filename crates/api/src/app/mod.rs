//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `routing.rs`: route tables and their validation/composition
//! - `wrapper.rs`: binds controller operations into handlers
//! - `routes/`: one route table per resource
//! - `controllers/`: the operations behind each route
//! - `services.rs`: repositories and token verification
//! - `dto.rs` / `schemas.rs`: request payloads and their constraints
//! - `errors.rs`: the single error-to-response path

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower::ServiceBuilder;
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;

pub mod controllers;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod routing;
pub mod schemas;
pub mod services;
pub mod wrapper;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Fails when a route table is misdeclared; nothing is served in that case.
/// A trailing `/` is trimmed before matching, so `/products/` hits `/products`.
pub fn build_app(
    services: Arc<services::AppServices>,
    config: &ApiConfig,
) -> Result<Router, routing::RouteTableError> {
    let base = Router::new().route(
        "/health",
        get(routes::system::health).fallback(routing::method_not_bound),
    );
    let app = routing::compose(base, routes::tables(&services))?;

    let app = app.fallback(routes::system::not_found).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(config.body_limit)),
    );

    // Path rewriting has to happen before routing, hence the outer router.
    Ok(Router::new().fallback_service(NormalizePath::trim_trailing_slash(app)))
}
