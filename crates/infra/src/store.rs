use std::collections::BTreeMap;
use std::sync::RwLock;

use thiserror::Error;

use shopfront_core::Entity;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A writer panicked while holding the lock; the data can no longer be trusted.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),
}

/// In-memory entity store for tests/dev.
///
/// Records are keyed by [`Entity::id`] and listed in key order.
#[derive(Debug)]
pub struct InMemoryStore<V: Entity> {
    name: &'static str,
    inner: RwLock<BTreeMap<V::Id, V>>,
}

impl<V: Entity> InMemoryStore<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    fn poisoned(&self) -> StoreError {
        tracing::error!(store = self.name, "store lock poisoned");
        StoreError::Unavailable(format!("{} lock poisoned", self.name))
    }
}

impl<V> InMemoryStore<V>
where
    V: Entity + Clone,
{
    pub fn get(&self, key: &V::Id) -> StoreResult<Option<V>> {
        let map = self.inner.read().map_err(|_| self.poisoned())?;
        Ok(map.get(key).cloned())
    }

    /// Insert a new record; an existing key is a [`StoreError::Duplicate`].
    pub fn insert(&self, value: V) -> StoreResult<()> {
        let mut map = self.inner.write().map_err(|_| self.poisoned())?;
        let key = value.id().clone();
        if map.contains_key(&key) {
            return Err(StoreError::Duplicate(format!("{}: {:?}", self.name, key)));
        }
        map.insert(key, value);
        Ok(())
    }

    /// Overwrite an existing record. Returns `false` when the key is absent.
    pub fn replace(&self, value: V) -> StoreResult<bool> {
        let mut map = self.inner.write().map_err(|_| self.poisoned())?;
        match map.get_mut(value.id()) {
            Some(slot) => {
                *slot = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&self, key: &V::Id) -> StoreResult<Option<V>> {
        let mut map = self.inner.write().map_err(|_| self.poisoned())?;
        Ok(map.remove(key))
    }

    pub fn list_where(&self, pred: impl Fn(&V) -> bool) -> StoreResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| self.poisoned())?;
        Ok(map.values().filter(|v| pred(v)).cloned().collect())
    }

    pub fn len(&self) -> StoreResult<usize> {
        let map = self.inner.read().map_err(|_| self.poisoned())?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: u32,
        body: &'static str,
    }

    impl Entity for Note {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn note(id: u32, body: &'static str) -> Note {
        Note { id, body }
    }

    #[test]
    fn insert_then_get() {
        let store = InMemoryStore::new("notes");
        store.insert(note(1, "a")).unwrap();
        assert_eq!(store.get(&1).unwrap(), Some(note(1, "a")));
        assert_eq!(store.get(&2).unwrap(), None);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let store = InMemoryStore::new("notes");
        store.insert(note(1, "a")).unwrap();
        let err = store.insert(note(1, "b")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.get(&1).unwrap(), Some(note(1, "a")));
    }

    #[test]
    fn replace_only_touches_existing_keys() {
        let store = InMemoryStore::new("notes");
        assert!(!store.replace(note(1, "a")).unwrap());
        assert!(store.is_empty().unwrap());

        store.insert(note(1, "a")).unwrap();
        assert!(store.replace(note(1, "b")).unwrap());
        assert_eq!(store.get(&1).unwrap(), Some(note(1, "b")));
    }

    #[test]
    fn list_is_key_ordered_and_filtered() {
        let store = InMemoryStore::new("notes");
        for (id, body) in [(3, "c"), (1, "a"), (2, "b")] {
            store.insert(note(id, body)).unwrap();
        }
        let all = store.list_where(|_| true).unwrap();
        assert_eq!(all.iter().map(|n| n.id).collect::<Vec<_>>(), [1, 2, 3]);

        let odd = store.list_where(|n| n.id % 2 == 1).unwrap();
        assert_eq!(odd.len(), 2);
    }

    #[test]
    fn remove_returns_previous_value() {
        let store = InMemoryStore::new("notes");
        store.insert(note(1, "a")).unwrap();
        assert_eq!(store.remove(&1).unwrap(), Some(note(1, "a")));
        assert_eq!(store.remove(&1).unwrap(), None);
        assert_eq!(store.len().unwrap(), 0);
    }
}
