use serde::Deserialize;

use shopfront_auth::User;
use shopfront_products::Product;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub base_price: Option<u64>,
    pub currency: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<u64>,
    pub currency: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id_typed().to_string(),
        "owner_id": p.owner_id().map(|o| o.to_string()),
        "name": p.name(),
        "description": p.description(),
        "pricing": {
            "base_price": p.pricing().base_price,
            "currency": p.pricing().currency,
        },
        "created_at": p.created_at().to_rfc3339(),
        "updated_at": p.updated_at().to_rfc3339(),
    })
}

pub fn user_to_json(u: &User) -> serde_json::Value {
    serde_json::json!({
        "id": u.id_typed().to_string(),
        "email": u.email(),
        "display_name": u.display_name(),
        "roles": u.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    })
}

pub fn items(values: impl IntoIterator<Item = serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "items": values.into_iter().collect::<Vec<_>>() })
}
