//! Client SDK for the Vogon resource store.
//!
//! [`Client`] talks to a `vogon apiserver` over HTTP. Connecting performs a
//! version handshake; objects are then read, written and deleted by name,
//! with `id`/`revision` preconditions checked by the server.

pub mod client;
pub mod error;

pub use client::{Client, WriteMode, SERVER_URI_ENV};
pub use error::{SdkError, SdkResult};

// Re-export the object model
pub use vogon_types::{MetadataResponse, Object, ObjectMetadata};
