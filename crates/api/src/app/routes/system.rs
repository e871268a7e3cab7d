use axum::http::StatusCode;
use axum::response::Response;

use crate::app::errors::{self, ApiError};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Fallback for requests no table matched.
pub async fn not_found() -> Response {
    errors::forward(ApiError::not_found("no route matches this path"))
}
