//! Infrastructure layer: storage adapters behind repository traits.

pub mod repositories;
pub mod store;

pub use repositories::{ProductRepository, UserRepository};
pub use store::{InMemoryStore, StoreError, StoreResult};
