//! Centralized error path.
//!
//! Every failure that reaches the wire (guard rejections, extractor failures,
//! controller errors, caught panics) is turned into a response by [`forward`].

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use shopfront_core::{DomainError, ValidationErrors};
use shopfront_infra::StoreError;

/// What a controller operation returns.
pub type ControllerResult = Result<Response, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload failed a schema.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Payload passed its schema but broke a domain rule.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidId(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidInput(_)
            | ApiError::BadRequest(_)
            | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) | ApiError::InvalidInput(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::InvalidId(_) => "invalid_id",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Unprocessable(_) => "invariant_violation",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::InvalidInput(msg),
            DomainError::InvariantViolation(msg) => ApiError::Unprocessable(msg),
            DomainError::InvalidId(msg) => ApiError::InvalidId(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => ApiError::Conflict(msg),
            StoreError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

/// Log a failure once and build its response.
///
/// Server-side failures keep their detail in the log only; the client gets a
/// generic message.
pub fn forward(err: ApiError) -> Response {
    let status = err.status();
    let code = err.code();

    if status.is_server_error() {
        tracing::error!(error = %err, code, status = status.as_u16(), "request failed");
    } else {
        tracing::warn!(error = %err, code, status = status.as_u16(), "request rejected");
    }

    let message = if status.is_server_error() {
        "internal server error".to_string()
    } else {
        err.to_string()
    };

    let mut response = match &err {
        ApiError::Validation(v) => (
            status,
            axum::Json(json!({
                "error": code,
                "message": message,
                "details": v.violations(),
            })),
        )
            .into_response(),
        _ => json_error(status, code, message),
    };

    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        forward(self)
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
