use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};
use vogon_db::DbError;
use vogon_types::ErrorResponse;

/// Message sent in place of the details of internal failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "error";

#[derive(Debug, Error)]
pub enum ServerError {
    /// The request could not be understood; the message is sent verbatim.
    #[error("{0}")]
    BadRequest(String),

    /// The request addressed nothing; the message is sent verbatim.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Db(DbError::DoesNotExist(_)) => StatusCode::NOT_FOUND,
            Self::Db(DbError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Db(DbError::InvalidPrecondition(_) | DbError::InvalidName(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Db(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message reported to the client.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_errors_map_to_status() {
        let cases = [
            (DbError::DoesNotExist("gone".into()), StatusCode::NOT_FOUND),
            (DbError::Conflict("clash".into()), StatusCode::CONFLICT),
            (DbError::InvalidPrecondition("bad".into()), StatusCode::BAD_REQUEST),
            (DbError::LockPoisoned("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status_code(), status);
        }
    }

    #[test]
    fn protocol_errors_keep_their_message() {
        let err = ServerError::from(DbError::Conflict(
            "object one already exists, cannot create".into(),
        ));
        assert_eq!(err.public_message(), "object one already exists, cannot create");
    }

    #[test]
    fn internal_errors_are_not_leaked() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = ServerError::from(DbError::from(io));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "error");
    }
}
