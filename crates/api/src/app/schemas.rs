//! Request payload schemas.

use shopfront_core::{FieldRule, Schema};

/// `POST` comment payload: `content` is optional, but when present it is a
/// string of at least 3 characters.
pub fn create_comment() -> Schema {
    Schema::object().field("content", FieldRule::string().min_len(3))
}

pub fn create_product() -> Schema {
    product_fields(FieldRule::string().min_len(1).max_len(200).required())
        .field("owner_id", FieldRule::string())
}

pub fn update_product() -> Schema {
    product_fields(FieldRule::string().min_len(1).max_len(200))
}

fn product_fields(name: FieldRule) -> Schema {
    Schema::object()
        .field("name", name)
        .field("description", FieldRule::string().max_len(2000))
        .field("base_price", FieldRule::integer().min(0.0))
        .field("currency", FieldRule::string().min_len(3).max_len(3))
}
