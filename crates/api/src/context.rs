use std::collections::HashMap;
use std::str::FromStr;

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use shopfront_auth::Role;
use shopfront_core::{DomainError, Schema, UserId};

use crate::app::errors::ApiError;

/// Authenticated identity for a request.
///
/// Attached to request extensions by the authentication guard; absent on
/// unguarded routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    roles: Vec<Role>,
}

impl Identity {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// Everything a controller operation may read from the request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    body: Option<Value>,
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Raw path parameter. A missing parameter means the route pattern and the
    /// controller disagree, which is a server bug.
    pub fn param(&self, name: &str) -> Result<&str, ApiError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ApiError::internal(format!("route has no path parameter ':{name}'")))
    }

    /// Path parameter parsed into a domain identifier.
    pub fn parse_param<T>(&self, name: &str) -> Result<T, ApiError>
    where
        T: FromStr<Err = DomainError>,
    {
        Ok(self.param(name)?.parse::<T>()?)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Check the body against `schema`, then deserialize it.
    ///
    /// A missing body is checked as `{}`.
    pub fn json<T: DeserializeOwned>(&self, schema: &Schema) -> Result<T, ApiError> {
        let empty = Value::Object(Default::default());
        let body = self.body.as_ref().unwrap_or(&empty);
        schema.validate(body)?;
        serde_json::from_value(body.clone())
            .map_err(|e| ApiError::bad_request(format!("invalid body: {e}")))
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Identity or a 401, for operations that only make sense behind the auth guard.
    pub fn require_identity(&self) -> Result<&Identity, ApiError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("authentication required"))
    }
}

#[async_trait]
impl<S> FromRequest<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let params = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, state).await {
            Ok(Path(p)) => p,
            Err(PathRejection::MissingPathParams(_)) => HashMap::new(),
            Err(e) => return Err(ApiError::bad_request(e.body_text())),
        };
        let query = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Query(q)| q)
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        let identity = parts.extensions.get::<Identity>().cloned();

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|e| match e.status() {
                StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(e.body_text()),
                _ => ApiError::bad_request(e.body_text()),
            })?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice(&bytes)
                    .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?,
            )
        };

        Ok(Self {
            params,
            query,
            body,
            identity,
        })
    }
}
