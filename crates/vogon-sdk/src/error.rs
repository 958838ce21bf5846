use thiserror::Error;
use vogon_types::TypeError;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid server URI {0:?}: expected http:// or https://")]
    InvalidUri(String),

    #[error("no server URI, set $VOGON_SERVER_URI")]
    MissingServerUri,

    #[error("unsupported server version {server:?}, this client is {client:?}")]
    UnsupportedVersion { server: String, client: String },

    /// The server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// HTTP status of a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected a write or delete because the
    /// stored object did not match the expected `id`/`revision`.
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
