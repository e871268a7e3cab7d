use std::sync::Arc;

use crate::app::controllers::UserController;
use crate::app::routing::{HttpMethod, RouteTable};
use crate::app::services::AppServices;
use crate::app::wrapper::wrap;
use crate::middleware::{AuthenticatedOnly, Guard};

pub const ROUTE_URL: &str = "user";

pub fn table(services: &AppServices) -> RouteTable {
    let controller = Arc::new(UserController::new(
        services.users.clone(),
        services.products.clone(),
    ));
    let authenticated: Arc<dyn Guard> = Arc::new(AuthenticatedOnly::new(services.jwt.clone()));

    // Static `/products` is matched before the `/:id` parameter.
    RouteTable::new(ROUTE_URL)
        .guarded(
            HttpMethod::Get,
            "/",
            [authenticated.clone()],
            wrap(&controller, UserController::me),
        )
        .guarded(
            HttpMethod::Get,
            "/products",
            [authenticated],
            wrap(&controller, UserController::get_user_products),
        )
        .route(HttpMethod::Get, "/:id", wrap(&controller, UserController::get_user))
        .route(
            HttpMethod::Get,
            "/products/:userId",
            wrap(&controller, UserController::get_products_of_user),
        )
}
