//! Route tables, one per resource.

use crate::app::routing::RouteTable;
use crate::app::services::AppServices;

pub mod products;
pub mod system;
pub mod user;

/// Every resource table, in mount order.
pub fn tables(services: &AppServices) -> Vec<RouteTable> {
    vec![products::table(services), user::table(services)]
}
