use std::sync::Arc;

use crate::app::controllers::ProductController;
use crate::app::routing::{HttpMethod, RouteTable};
use crate::app::services::AppServices;
use crate::app::wrapper::wrap;

pub const ROUTE_URL: &str = "products";

pub fn table(services: &AppServices) -> RouteTable {
    let controller = Arc::new(ProductController::new(
        services.products.clone(),
        services.users.clone(),
    ));

    RouteTable::new(ROUTE_URL)
        .route(HttpMethod::Get, "/", wrap(&controller, ProductController::get_products))
        .route(HttpMethod::Post, "/", wrap(&controller, ProductController::create_product))
        .route(HttpMethod::Put, "/:id", wrap(&controller, ProductController::update_product))
        .route(HttpMethod::Delete, "/:id", wrap(&controller, ProductController::delete_product))
}
