use std::sync::Arc;

use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use shopfront_core::{ProductId, UserId};
use shopfront_infra::{ProductRepository, UserRepository};
use shopfront_products::{CreateProduct, PricingMetadata, Product, UpdateProduct};

use crate::app::errors::{ApiError, ControllerResult};
use crate::app::{dto, schemas};
use crate::context::RequestContext;

pub struct ProductController {
    products: Arc<dyn ProductRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProductController {
    pub fn new(products: Arc<dyn ProductRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { products, users }
    }

    pub async fn get_products(self: Arc<Self>, _ctx: RequestContext) -> ControllerResult {
        let products = self.products.list()?;
        Ok((StatusCode::OK, Json(dto::items(products.iter().map(dto::product_to_json)))).into_response())
    }

    pub async fn create_product(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let body: dto::CreateProductRequest = ctx.json(&schemas::create_product())?;

        let owner_id = match body.owner_id.as_deref() {
            Some(raw) => {
                let owner: UserId = raw.parse()?;
                if self.users.get(owner)?.is_none() {
                    return Err(ApiError::unprocessable(format!("owner {owner} does not exist")));
                }
                Some(owner)
            }
            None => None,
        };

        let pricing = (body.base_price.is_some() || body.currency.is_some()).then(|| PricingMetadata {
            base_price: body.base_price,
            currency: body.currency,
        });

        let product = Product::create(CreateProduct {
            product_id: ProductId::new(),
            owner_id,
            name: body.name,
            description: body.description,
            pricing,
            occurred_at: Utc::now(),
        })?;
        self.products.insert(product.clone())?;

        tracing::info!(product_id = %product.id_typed(), "product created");
        Ok((StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response())
    }

    pub async fn update_product(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let id: ProductId = ctx.parse_param("id")?;
        let body: dto::UpdateProductRequest = ctx.json(&schemas::update_product())?;

        let mut product = self
            .products
            .get(id)?
            .ok_or_else(|| ApiError::not_found("product not found"))?;

        let pricing = (body.base_price.is_some() || body.currency.is_some()).then(|| PricingMetadata {
            base_price: body.base_price.or(product.pricing().base_price),
            currency: body.currency.or_else(|| product.pricing().currency.clone()),
        });

        product.update(UpdateProduct {
            name: body.name,
            description: body.description,
            pricing,
            occurred_at: Utc::now(),
        })?;

        if !self.products.replace(product.clone())? {
            return Err(ApiError::not_found("product not found"));
        }
        Ok((StatusCode::OK, Json(dto::product_to_json(&product))).into_response())
    }

    pub async fn delete_product(self: Arc<Self>, ctx: RequestContext) -> ControllerResult {
        let id: ProductId = ctx.parse_param("id")?;
        match self.products.remove(id)? {
            Some(_) => {
                tracing::info!(product_id = %id, "product deleted");
                Ok(StatusCode::NO_CONTENT.into_response())
            }
            None => Err(ApiError::not_found("product not found")),
        }
    }
}
