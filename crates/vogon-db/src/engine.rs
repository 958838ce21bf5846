//! The optimistic-concurrency protocol.
//!
//! [`KvDatabase`] implements [`Database`] on top of any [`Lock`] +
//! [`KeyValueStore`] pair. Each operation holds the lock from its first read
//! to its last write, so the check against the stored `id`/`revision` and
//! the write that follows it cannot interleave with another operation.
//!
//! `id` pins a lineage and survives updates; `revision` pins an exact version
//! and changes on every mutation. Supplying neither means last writer wins,
//! `id` alone means "this object, any version", both means full
//! compare-and-swap. A `revision` without an `id` is rejected.

use std::fmt;

use chrono::Utc;
use tracing::debug;
use vogon_types::{random_token, validate_name, MetadataResponse, Object, ObjectMetadata};

use crate::error::{DbError, DbResult};
use crate::traits::{Database, KeyValueStore, Lock};

/// Storage engine over a lock and a key-value store.
pub struct KvDatabase<L, S> {
    lock: L,
    store: S,
}

impl<L: Lock, S: KeyValueStore> KvDatabase<L, S> {
    /// Compose an engine from a lock and the store it guards.
    ///
    /// The lock must exclude every other engine that can reach `store`.
    pub fn new(lock: L, store: S) -> Self {
        Self { lock, store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// The mutation a precondition check guards, used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Mutation {
    Replace,
    Update,
    Delete,
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Compare the caller's expected tokens with the stored metadata.
///
/// Empty expectations always pass. The `id` is checked first.
pub(crate) fn check_expected(
    mutation: Mutation,
    name: &str,
    id: &str,
    revision: &str,
    stored: &ObjectMetadata,
) -> DbResult<()> {
    if !id.is_empty() && id != stored.id {
        return Err(DbError::Conflict(format!(
            "object {name} does not have the expected id, cannot {mutation}"
        )));
    }

    if !revision.is_empty() {
        if id.is_empty() {
            return Err(DbError::InvalidPrecondition(format!(
                "cannot {mutation} object {name}: cannot compare by revision without an id"
            )));
        }
        if revision != stored.revision {
            return Err(DbError::Conflict(format!(
                "object {name} does not have the expected revision, cannot {mutation}"
            )));
        }
    }

    Ok(())
}

/// A revision token distinct from `previous`.
fn next_revision(previous: &str) -> String {
    loop {
        let revision = random_token();
        if revision != previous {
            return revision;
        }
    }
}

/// Carry the engine-owned fields of `previous` over to `object` and assign it
/// a new revision.
fn supersede(object: &mut Object, previous: ObjectMetadata) {
    object.metadata.revision = next_revision(&previous.revision);
    object.metadata.creation_time = previous.creation_time;
    object.metadata.id = previous.id;
}

impl<L: Lock, S: KeyValueStore> Database for KvDatabase<L, S> {
    fn create(&self, mut object: Object, replace: bool) -> DbResult<MetadataResponse> {
        let name = object.metadata.name.clone();
        validate_name(&name)?;

        let _guard = self.lock.acquire()?;

        match self.store.read(&name)? {
            Some(previous) => {
                if !replace {
                    return Err(DbError::Conflict(format!(
                        "object {name} already exists, cannot create"
                    )));
                }
                check_expected(
                    Mutation::Replace,
                    &name,
                    &object.metadata.id,
                    &object.metadata.revision,
                    &previous.metadata,
                )?;
                supersede(&mut object, previous.metadata);
            }
            None => {
                object.metadata.creation_time = Some(Utc::now());
                object.metadata.id = random_token();
                object.metadata.revision = random_token();
            }
        }

        self.store.write(&name, &object)?;
        debug!(
            name = %name,
            id = %object.metadata.id,
            revision = %object.metadata.revision,
            "object written by create"
        );
        Ok(MetadataResponse::from(&object.metadata))
    }

    fn update(&self, mut object: Object) -> DbResult<MetadataResponse> {
        let name = object.metadata.name.clone();
        validate_name(&name)?;

        let _guard = self.lock.acquire()?;

        let previous = self.store.read(&name)?.ok_or_else(|| {
            DbError::DoesNotExist(format!("object {name} does not exist, cannot update"))
        })?;
        check_expected(
            Mutation::Update,
            &name,
            &object.metadata.id,
            &object.metadata.revision,
            &previous.metadata,
        )?;
        supersede(&mut object, previous.metadata);

        self.store.write(&name, &object)?;
        debug!(
            name = %name,
            id = %object.metadata.id,
            revision = %object.metadata.revision,
            "object updated"
        );
        Ok(MetadataResponse::from(&object.metadata))
    }

    fn get(&self, name: &str) -> DbResult<Object> {
        validate_name(name)?;

        let _guard = self.lock.acquire()?;

        self.store
            .read(name)?
            .ok_or_else(|| DbError::DoesNotExist(format!("object {name} does not exist")))
    }

    fn delete(&self, name: &str, id: &str, revision: &str) -> DbResult<MetadataResponse> {
        validate_name(name)?;

        let _guard = self.lock.acquire()?;

        let previous = self
            .store
            .read(name)?
            .ok_or_else(|| DbError::DoesNotExist(format!("object {name} does not exist")))?;
        check_expected(Mutation::Delete, name, id, revision, &previous.metadata)?;

        if !self.store.delete(name)? {
            // Only reachable if the store was modified behind the lock's back.
            return Err(DbError::DoesNotExist(format!("object {name} does not exist")));
        }
        debug!(name = %name, id = %previous.metadata.id, "object deleted");
        Ok(MetadataResponse::from(&previous.metadata))
    }
}

impl<L, S: fmt::Debug> fmt::Debug for KvDatabase<L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvDatabase").field("store", &self.store).finish()
    }
}
