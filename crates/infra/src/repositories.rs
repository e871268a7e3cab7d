//! Repository seams consumed by the API controllers.

use std::sync::Arc;

use shopfront_auth::User;
use shopfront_core::{ProductId, UserId};
use shopfront_products::Product;

use crate::store::{InMemoryStore, StoreResult};

/// Product persistence.
pub trait ProductRepository: Send + Sync {
    fn list(&self) -> StoreResult<Vec<Product>>;
    fn list_by_owner(&self, owner: UserId) -> StoreResult<Vec<Product>>;
    fn get(&self, id: ProductId) -> StoreResult<Option<Product>>;
    fn insert(&self, product: Product) -> StoreResult<()>;
    /// Returns `false` when the product no longer exists.
    fn replace(&self, product: Product) -> StoreResult<bool>;
    fn remove(&self, id: ProductId) -> StoreResult<Option<Product>>;
}

/// User persistence.
pub trait UserRepository: Send + Sync {
    fn get(&self, id: UserId) -> StoreResult<Option<User>>;
    fn insert(&self, user: User) -> StoreResult<()>;
}

impl ProductRepository for InMemoryStore<Product> {
    fn list(&self) -> StoreResult<Vec<Product>> {
        self.list_where(|_| true)
    }

    fn list_by_owner(&self, owner: UserId) -> StoreResult<Vec<Product>> {
        self.list_where(|p| p.is_owned_by(owner))
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        InMemoryStore::get(self, &id)
    }

    fn insert(&self, product: Product) -> StoreResult<()> {
        InMemoryStore::insert(self, product)
    }

    fn replace(&self, product: Product) -> StoreResult<bool> {
        InMemoryStore::replace(self, product)
    }

    fn remove(&self, id: ProductId) -> StoreResult<Option<Product>> {
        InMemoryStore::remove(self, &id)
    }
}

impl UserRepository for InMemoryStore<User> {
    fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        InMemoryStore::get(self, &id)
    }

    fn insert(&self, user: User) -> StoreResult<()> {
        InMemoryStore::insert(self, user)
    }
}

impl<S> ProductRepository for Arc<S>
where
    S: ProductRepository + ?Sized,
{
    fn list(&self) -> StoreResult<Vec<Product>> {
        (**self).list()
    }

    fn list_by_owner(&self, owner: UserId) -> StoreResult<Vec<Product>> {
        (**self).list_by_owner(owner)
    }

    fn get(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).get(id)
    }

    fn insert(&self, product: Product) -> StoreResult<()> {
        (**self).insert(product)
    }

    fn replace(&self, product: Product) -> StoreResult<bool> {
        (**self).replace(product)
    }

    fn remove(&self, id: ProductId) -> StoreResult<Option<Product>> {
        (**self).remove(id)
    }
}

impl<S> UserRepository for Arc<S>
where
    S: UserRepository + ?Sized,
{
    fn get(&self, id: UserId) -> StoreResult<Option<User>> {
        (**self).get(id)
    }

    fn insert(&self, user: User) -> StoreResult<()> {
        (**self).insert(user)
    }
}
