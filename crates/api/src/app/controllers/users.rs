use std::sync::Arc;

use axum::{Json, http::StatusCode, response::IntoResponse};

use shopfront_core::UserId;
use shopfront_infra::{ProductRepository, UserRepository};

use crate::app::dto;
use crate::app::errors::{ApiError, ControllerResult};
use crate::context::RequestContext;

pub struct UserController {
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
}

impl UserController {
    pub fn new(users: Arc<dyn UserRepository>, products: Arc<dyn ProductRepository>) -> Self {
        Self { users, products }
    }

    fn products_json(&self, owner: UserId) -> ControllerResult {
        let products = self.products.list_by_owner(owner)?;
        Ok((StatusCode::OK, Json(dto::items(products.iter().map(dto::product_to_json)))).into_response())
    }

    /// The authenticated caller's profile.
    pub async fn me(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let identity = ctx.require_identity()?;
        let user = self
            .users
            .get(identity.user_id())?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        Ok((StatusCode::OK, Json(dto::user_to_json(&user))).into_response())
    }

    /// Products owned by the authenticated caller.
    pub async fn get_user_products(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let identity = ctx.require_identity()?;
        self.products_json(identity.user_id())
    }

    pub async fn get_user(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let id: UserId = ctx.parse_param("id")?;
        let user = self
            .users
            .get(id)?
            .ok_or_else(|| ApiError::not_found("user not found"))?;
        Ok((StatusCode::OK, Json(dto::user_to_json(&user))).into_response())
    }

    /// Products owned by the user named in the path.
    pub async fn get_products_of_user(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let id: UserId = ctx.parse_param("userId")?;
        if self.users.get(id)?.is_none() {
            return Err(ApiError::not_found("user not found"));
        }
        self.products_json(id)
    }
}
