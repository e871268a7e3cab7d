//! Controllers: one async operation per route.
//!
//! Every operation has the shape `async fn(self: Arc<Self>, RequestContext) -> ControllerResult`
//! so it can be bound by [`crate::app::wrapper::wrap`].

pub mod products;
pub mod users;

pub use products::ProductController;
pub use users::UserController;
