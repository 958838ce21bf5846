//! Auxiliary HTTP payloads exchanged between the API server and its clients.
//!
//! Objects and [`MetadataResponse`](crate::MetadataResponse)s travel as-is;
//! these are the remaining bodies.

use serde::{Deserialize, Serialize};

/// Body of every non-success response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of `GET /_version`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}
