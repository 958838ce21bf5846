//! Storage engine for the Vogon resource store.
//!
//! Objects are created, read, updated and deleted through an
//! optimistic-concurrency protocol: every stored object carries an `id` that
//! pins its lineage and a `revision` that changes on every mutation. Callers
//! state which `id`/`revision` they expect, and the engine rejects the write
//! with [`DbError::Conflict`] if the stored object differs.
//!
//! # Architecture
//!
//! The engine, [`KvDatabase`], is generic over a capability pair:
//!
//! - a [`Lock`] that serializes engine operations against one backing store;
//! - a [`KeyValueStore`] that reads, writes and deletes whole objects by name.
//!
//! The engine holds the lock for the whole read-check-write sequence of each
//! operation, so the store itself needs no atomicity of its own.
//!
//! # Backends
//!
//! - [`InMemoryDatabase`] -- `HashMap` plus an in-process mutex; for tests and
//!   ephemeral single-process use
//! - [`FilesDatabase`] -- one JSON file per object in a directory, guarded by
//!   an advisory lock on `<directory>/_lock` so several processes can share it
//!
//! # Modules
//!
//! - [`error`] -- The [`DbError`] enum
//! - [`traits`] -- [`Lock`], [`KeyValueStore`] and the [`Database`] interface
//! - [`engine`] -- The [`KvDatabase`] protocol implementation
//! - [`memory`] -- In-memory lock and store
//! - [`files`] -- File lock and directory store

pub mod engine;
pub mod error;
pub mod files;
pub mod memory;
pub mod traits;

pub use engine::KvDatabase;
pub use error::{DbError, DbResult};
pub use files::{DirectoryStore, FileLock, FilesDatabase};
pub use memory::{InMemoryDatabase, MemoryLock, MemoryStore};
pub use traits::{Database, KeyValueStore, Lock};

pub use vogon_types::{MetadataResponse, Object, ObjectMetadata};
