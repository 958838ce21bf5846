//! Request handlers for the object API.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;
use vogon_db::{Database, DbError, DbResult};
use vogon_types::{name_and_version, validate_name, MetadataResponse, Object, VersionResponse};

use crate::error::{ServerError, ServerResult};

/// Text served on `GET /`.
pub const WELCOME_TEXT: &str = "This is the Vogon API server.\n";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Run a blocking engine call off the async executor.
    async fn run<T, F>(&self, f: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Database) -> DbResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let result = tokio::task::spawn_blocking(move || f(db.as_ref()))
            .await
            .map_err(|e| ServerError::Internal(format!("engine task failed: {e}")))?;
        Ok(result?)
    }
}

/// Query parameters of `PUT /{name}`.
#[derive(Debug, Deserialize)]
pub struct PutParams {
    #[serde(default = "yes")]
    pub create: bool,
    #[serde(default = "yes")]
    pub replace: bool,
}

fn yes() -> bool {
    true
}

/// Query parameters of `DELETE /{name}`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub revision: String,
}

pub async fn welcome() -> &'static str {
    WELCOME_TEXT
}

pub async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: name_and_version(),
    })
}

/// Any method a route does not serve.
pub async fn unsupported_method() -> ServerError {
    ServerError::BadRequest("Unsupported method".to_string())
}

/// Any path no route matches.
pub async fn invalid_path() -> ServerError {
    ServerError::BadRequest("Invalid path".to_string())
}

pub async fn get_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ServerResult<Json<Object>> {
    let name = object_name(path)?;
    match state.run(move |db| db.get(&name)).await {
        Ok(object) => Ok(Json(object)),
        Err(ServerError::Db(DbError::DoesNotExist(_))) => {
            Err(ServerError::NotFound("No such object".to_string()))
        }
        Err(e) => Err(e),
    }
}

pub async fn put_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<PutParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Json<MetadataResponse>> {
    let name = object_name(path)?;
    let Query(params) = params.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let object = read_object(&name, &body_bytes(body)?)?;
    debug!(%name, create = params.create, replace = params.replace, "put object");

    let response = match (params.create, params.replace) {
        (true, replace) => state.run(move |db| db.create(object, replace)).await?,
        (false, true) => state.run(move |db| db.update(object)).await?,
        (false, false) => return Err(ServerError::BadRequest("Nothing to do".to_string())),
    };
    Ok(Json(response))
}

pub async fn post_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> ServerResult<Json<MetadataResponse>> {
    let name = object_name(path)?;
    let object = read_object(&name, &body_bytes(body)?)?;
    debug!(%name, "update object");
    let response = state.run(move |db| db.update(object)).await?;
    Ok(Json(response))
}

pub async fn delete_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    params: Result<Query<DeleteParams>, QueryRejection>,
) -> ServerResult<Json<MetadataResponse>> {
    let name = object_name(path)?;
    let Query(params) = params.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    debug!(%name, "delete object");
    let response = state
        .run(move |db| db.delete(&name, &params.id, &params.revision))
        .await?;
    Ok(Json(response))
}

/// Validate the captured path as an object name.
fn object_name(path: String) -> ServerResult<String> {
    match validate_name(&path) {
        Ok(()) => Ok(path),
        Err(_) => Err(ServerError::BadRequest("Invalid path".to_string())),
    }
}

fn body_bytes(body: Result<Bytes, BytesRejection>) -> ServerResult<Bytes> {
    body.map_err(|e| ServerError::BadRequest(format!("error reading input: {}", e.body_text())))
}

/// Decode a request body as an object stored under `name`.
fn read_object(name: &str, body: &[u8]) -> ServerResult<Object> {
    let object: Object = serde_json::from_slice(body)
        .map_err(|e| ServerError::BadRequest(format!("error reading input: {e}")))?;
    if object.metadata.name != name {
        return Err(ServerError::BadRequest("Mismatched name".to_string()));
    }
    Ok(object)
}
