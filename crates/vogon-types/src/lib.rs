//! Object model for the Vogon resource store.
//!
//! This crate holds the data structures shared by every other Vogon crate:
//! the storage engine, the HTTP server, the client SDK, and the CLI. It has
//! no storage logic of its own.
//!
//! # Key Types
//!
//! - [`Object`] -- A named, versioned resource with opaque `spec`/`status`
//! - [`ObjectMetadata`] -- Identity and versioning envelope owned by the engine
//! - [`MetadataResponse`] -- The `{id, revision}` pair returned by mutations
//!
//! # Modules
//!
//! - [`api`] -- Error and version bodies of the HTTP API
//! - [`name`] -- Object name validation
//! - [`token`] -- Random `id`/`revision` token generation
//! - [`version`] -- Name-and-version string used for client/server handshakes

pub mod api;
pub mod error;
pub mod name;
pub mod object;
pub mod token;
pub mod version;

pub use api::{ErrorResponse, VersionResponse};
pub use error::TypeError;
pub use name::validate_name;
pub use object::{MetadataResponse, Object, ObjectMetadata};
pub use token::random_token;
pub use version::name_and_version;
