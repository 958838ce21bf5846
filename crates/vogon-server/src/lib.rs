//! HTTP API server for the Vogon resource store.
//!
//! Exposes a [`Database`](vogon_db::Database) over HTTP: objects live at
//! `/{name}`, and the query string carries the create/replace switches and
//! delete preconditions. Engine outcomes map to status codes (`404` missing,
//! `409` conflict, `400` malformed request) with a `{"message": ...}` body.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{DatabaseConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::ApiServer;
