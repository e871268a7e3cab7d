//! Service wiring: repositories and token verification shared by controllers.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};

use shopfront_auth::{Hs256JwtValidator, JwtClaims, JwtValidator, Role, User, encode_hs256};
use shopfront_core::{ProductId, UserId};
use shopfront_infra::{InMemoryStore, ProductRepository, UserRepository};
use shopfront_products::{CreateProduct, PricingMetadata, Product};

pub struct AppServices {
    pub products: Arc<dyn ProductRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt: Arc<dyn JwtValidator>,
}

impl AppServices {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        users: Arc<dyn UserRepository>,
        jwt: Arc<dyn JwtValidator>,
    ) -> Self {
        Self { products, users, jwt }
    }

    /// In-memory stores + HS256 tokens signed with `jwt_secret`.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self::new(
            Arc::new(InMemoryStore::<Product>::new("products")),
            Arc::new(InMemoryStore::<User>::new("users")),
            Arc::new(Hs256JwtValidator::new(jwt_secret)),
        )
    }
}

/// Result of [`seed_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub user_id: UserId,
    pub token: String,
}

/// Insert one demo user owning two products and mint a 24h token for them.
pub fn seed_demo_data(services: &AppServices, jwt_secret: &str) -> anyhow::Result<DemoSeed> {
    let now = Utc::now();
    let user_id = UserId::new();
    let user = User::new(user_id, "demo@shopfront.local", "Demo User")?
        .with_roles(vec![Role::new("customer")]);
    services.users.insert(user).context("inserting demo user")?;

    for (name, price) in [("Espresso Cup", 1_250), ("Pour-over Kettle", 4_900)] {
        let product = Product::create(CreateProduct {
            product_id: ProductId::new(),
            owner_id: Some(user_id),
            name: name.to_string(),
            description: None,
            pricing: Some(PricingMetadata {
                base_price: Some(price),
                currency: Some("USD".to_string()),
            }),
            occurred_at: now,
        })?;
        services.products.insert(product).context("inserting demo product")?;
    }

    let claims = JwtClaims::new(user_id, vec![Role::new("customer")], now, Duration::hours(24));
    let token = encode_hs256(jwt_secret, &claims)?;
    Ok(DemoSeed { user_id, token })
}
