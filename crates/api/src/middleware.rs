//! Request guards: filters that run before a route's handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use shopfront_auth::JwtValidator;

use crate::app::errors::ApiError;
use crate::context::Identity;

/// A request filter. Returning `Err` short-circuits the chain; the error goes
/// through the centralized error path and the handler never runs.
///
/// Guards may attach data to the request extensions for downstream readers.
pub trait Guard: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn check(&self, req: &mut Request) -> Result<(), ApiError>;
}

/// Ordered guards attached to one route.
#[derive(Clone)]
pub struct GuardChain(Arc<[Arc<dyn Guard>]>);

impl GuardChain {
    pub fn new(guards: Vec<Arc<dyn Guard>>) -> Self {
        Self(guards.into())
    }
}

/// Run every guard in declaration order; the first rejection wins.
pub async fn run_guards(State(chain): State<GuardChain>, mut req: Request, next: Next) -> Response {
    for guard in chain.0.iter() {
        if let Err(err) = guard.check(&mut req) {
            tracing::debug!(guard = guard.name(), "guard rejected request");
            return err.into_response();
        }
    }
    next.run(req).await
}

/// Authentication gate: requires a valid `Authorization: Bearer <jwt>` and
/// attaches the caller's [`Identity`].
#[derive(Clone)]
pub struct AuthenticatedOnly {
    jwt: Arc<dyn JwtValidator>,
}

impl AuthenticatedOnly {
    pub fn new(jwt: Arc<dyn JwtValidator>) -> Self {
        Self { jwt }
    }
}

impl Guard for AuthenticatedOnly {
    fn name(&self) -> &'static str {
        "authenticated_only"
    }

    fn check(&self, req: &mut Request) -> Result<(), ApiError> {
        let token = extract_bearer(req.headers())?;

        let claims = self
            .jwt
            .validate(token, Utc::now())
            .map_err(|e| ApiError::unauthorized(e.to_string()))?;

        req.extensions_mut()
            .insert(Identity::new(claims.sub, claims.roles));
        Ok(())
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;

    let header = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("authorization header is not valid ASCII"))?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("authorization scheme must be Bearer"))?;

    let token = header.trim();
    if token.is_empty() {
        return Err(ApiError::unauthorized("missing bearer token"));
    }

    Ok(token)
}
