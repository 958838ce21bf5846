//! In-memory backend for testing and ephemeral use.
//!
//! [`MemoryStore`] keeps objects in a `HashMap` behind a `RwLock`;
//! [`MemoryLock`] is a plain in-process mutex. Data is lost when the store is
//! dropped.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use vogon_types::Object;

use crate::engine::KvDatabase;
use crate::error::{DbError, DbResult};
use crate::traits::{KeyValueStore, Lock};

/// Engine over an in-process mutex and a `HashMap`.
pub type InMemoryDatabase = KvDatabase<MemoryLock, MemoryStore>;

impl InMemoryDatabase {
    /// Create a new empty in-memory database.
    pub fn new_in_memory() -> Self {
        KvDatabase::new(MemoryLock::new(), MemoryStore::new())
    }
}

/// In-process mutual exclusion.
#[derive(Debug, Default)]
pub struct MemoryLock {
    mutex: Mutex<()>,
}

impl MemoryLock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Lock for MemoryLock {
    type Guard<'a> = MutexGuard<'a, ()>;

    fn acquire(&self) -> DbResult<MutexGuard<'_, ()>> {
        // The mutex guards no data, so a poisoned lock is still usable.
        Ok(self.mutex.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// `HashMap`-based object store.
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Object>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> DbResult<usize> {
        Ok(self.objects.read().map_err(poisoned)?.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> DbResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Sorted names of all stored objects.
    #[cfg(test)]
    fn names(&self) -> DbResult<Vec<String>> {
        let map = self.objects.read().map_err(poisoned)?;
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(e: PoisonError<T>) -> DbError {
    DbError::LockPoisoned(e.to_string())
}

impl KeyValueStore for MemoryStore {
    fn read(&self, name: &str) -> DbResult<Option<Object>> {
        let map = self.objects.read().map_err(poisoned)?;
        Ok(map.get(name).cloned())
    }

    fn write(&self, name: &str, object: &Object) -> DbResult<()> {
        let mut map = self.objects.write().map_err(poisoned)?;
        map.insert(name.to_string(), object.clone());
        Ok(())
    }

    fn delete(&self, name: &str) -> DbResult<bool> {
        let mut map = self.objects.write().map_err(poisoned)?;
        Ok(map.remove(name).is_some())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("object_count", &self.len().ok())
            .finish()
    }
}
