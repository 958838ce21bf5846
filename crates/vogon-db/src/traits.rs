use vogon_types::{MetadataResponse, Object};

use crate::error::DbResult;

/// Mutual exclusion over one backing store.
///
/// [`acquire`](Lock::acquire) blocks until the lock is held and returns a
/// guard; dropping the guard releases the lock. The engine holds the guard
/// for the full duration of each operation, so the lock must serialize every
/// caller that can reach the same backing store. For stores shared between
/// processes this means an OS-visible lock.
pub trait Lock: Send + Sync {
    /// Guard releasing the lock on drop.
    type Guard<'a>
    where
        Self: 'a;

    /// Block until the lock is held.
    fn acquire(&self) -> DbResult<Self::Guard<'_>>;
}

/// Whole-object key-value storage, keyed by object name.
///
/// Implementations need no atomicity across calls: the engine wraps every
/// read-check-write sequence in a [`Lock`].
pub trait KeyValueStore: Send + Sync {
    /// Read the object stored under `name`.
    ///
    /// Returns `Ok(None)` if there is none.
    fn read(&self, name: &str) -> DbResult<Option<Object>>;

    /// Store `object` under `name`, replacing any previous value.
    fn write(&self, name: &str, object: &Object) -> DbResult<()>;

    /// Remove the object stored under `name`.
    ///
    /// Returns `Ok(true)` if it existed, `Ok(false)` if there was nothing to
    /// remove.
    fn delete(&self, name: &str) -> DbResult<bool>;
}

/// The resource store interface consumed by the HTTP server and other callers.
///
/// Expected tokens are passed as empty strings when the caller has no
/// expectation. A non-empty `revision` requires a non-empty `id`.
pub trait Database: Send + Sync {
    /// Create an object.
    ///
    /// If it already exists and `replace` is false, fails with
    /// [`Conflict`](crate::DbError::Conflict). If `replace` is true, the
    /// object's `metadata.id`/`metadata.revision` must match the stored ones
    /// when they are not empty.
    fn create(&self, object: Object, replace: bool) -> DbResult<MetadataResponse>;

    /// Update an existing object.
    ///
    /// `metadata.id`/`metadata.revision` must match the stored ones when they
    /// are not empty.
    fn update(&self, object: Object) -> DbResult<MetadataResponse>;

    /// Get a single object by name.
    fn get(&self, name: &str) -> DbResult<Object>;

    /// Delete an object, returning the tokens of the removed version.
    ///
    /// `id`/`revision` must match the stored ones when they are not empty.
    fn delete(&self, name: &str, id: &str, revision: &str) -> DbResult<MetadataResponse>;
}
