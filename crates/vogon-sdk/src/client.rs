//! HTTP client for the Vogon API server.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use vogon_types::{
    name_and_version, validate_name, ErrorResponse, MetadataResponse, Object, VersionResponse,
};

use crate::error::{SdkError, SdkResult};

/// Environment variable holding the server URI for [`Client::from_env`].
pub const SERVER_URI_ENV: &str = "VOGON_SERVER_URI";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How [`Client::write_object`] treats existing and missing objects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Create the object, or replace it if it exists.
    #[default]
    CreateOrReplace,
    /// Create the object; fail with a conflict if it exists.
    Create,
    /// Replace an existing object; fail if it does not exist.
    Replace,
}

impl WriteMode {
    fn query(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::CreateOrReplace => &[],
            Self::Create => &[("replace", "false")],
            Self::Replace => &[("create", "false")],
        }
    }
}

/// Connection to one API server.
///
/// ```rust,no_run
/// use vogon_sdk::{Client, Object, WriteMode};
///
/// # async fn run() -> vogon_sdk::SdkResult<()> {
/// let client = Client::connect("http://127.0.0.1:8080").await?;
/// let object = Object::new("example.org/Example", "v1", "one");
/// let meta = client.write_object(&object, WriteMode::Create).await?;
/// println!("created {}", meta.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    base_uri: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client without contacting the server.
    pub fn new(uri: &str) -> SdkResult<Self> {
        if !(uri.starts_with("http://") || uri.starts_with("https://")) {
            return Err(SdkError::InvalidUri(uri.to_string()));
        }
        let base_uri = uri.strip_suffix('/').unwrap_or(uri).to_string();
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base_uri, http })
    }

    /// Create a client and check that the server runs the same version.
    pub async fn connect(uri: &str) -> SdkResult<Self> {
        let client = Self::new(uri)?;
        let server = client.version().await?;
        let local = name_and_version();
        if server != local {
            return Err(SdkError::UnsupportedVersion {
                server,
                client: local,
            });
        }
        debug!(uri = %client.base_uri, "connected to server");
        Ok(client)
    }

    /// [`connect`](Self::connect) to the server named by `$VOGON_SERVER_URI`.
    pub async fn from_env() -> SdkResult<Self> {
        let uri = std::env::var(SERVER_URI_ENV).map_err(|_| SdkError::MissingServerUri)?;
        Self::connect(&uri).await
    }

    /// Server URI, without trailing slash.
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Name and version reported by the server.
    pub async fn version(&self) -> SdkResult<String> {
        let response = self.http.get(self.url("_version")).send().await?;
        let body: VersionResponse = handle_response(response).await?;
        Ok(body.version)
    }

    /// Fetch an object, or `None` if it does not exist.
    pub async fn get_object(&self, name: &str) -> SdkResult<Option<Object>> {
        validate_name(name)?;
        let response = self.http.get(self.url(name)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        handle_response(response).await.map(Some)
    }

    /// Write an object under its own name.
    ///
    /// `metadata.id`/`metadata.revision`, when set, are preconditions checked
    /// by the server.
    pub async fn write_object(&self, object: &Object, mode: WriteMode) -> SdkResult<MetadataResponse> {
        let name = object.name();
        validate_name(name)?;
        debug!(%name, ?mode, "writing object");
        let response = self
            .http
            .put(self.url(name))
            .query(mode.query())
            .json(object)
            .send()
            .await?;
        handle_response(response).await
    }

    /// Delete an object. Empty `id`/`revision` are not sent.
    pub async fn delete_object(
        &self,
        name: &str,
        id: &str,
        revision: &str,
    ) -> SdkResult<MetadataResponse> {
        validate_name(name)?;
        let mut query = Vec::new();
        if !id.is_empty() {
            query.push(("id", id));
        }
        if !revision.is_empty() {
            query.push(("revision", revision));
        }
        debug!(%name, "deleting object");
        let response = self
            .http
            .delete(self.url(name))
            .query(&query)
            .send()
            .await?;
        handle_response(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_uri, path)
    }
}

/// Decode a successful response or turn the error body into [`SdkError::Server`].
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> SdkResult<T> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(serde_json::from_str(&body)?);
    }
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(err) => err.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("HTTP {status}"),
    };
    Err(SdkError::Server {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use tokio::net::TcpListener;
    use vogon_db::InMemoryDatabase;

    async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    async fn spawn_server() -> String {
        spawn(vogon_server::build_router(Arc::new(
            InMemoryDatabase::new_in_memory(),
        )))
        .await
    }

    fn object(name: &str, value: i64) -> Object {
        Object::new("example.org/Example", "v1", name).with_spec(json!({"n": value}))
    }

    #[test]
    fn new_normalizes_uri() {
        let client = Client::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_uri(), "http://localhost:8080");
        assert_eq!(client.url("one"), "http://localhost:8080/one");
        assert!(matches!(
            Client::new("localhost:8080"),
            Err(SdkError::InvalidUri(_))
        ));
    }

    #[tokio::test]
    async fn connect_checks_version() {
        let uri = spawn_server().await;
        let client = Client::connect(&format!("{uri}/")).await.unwrap();
        assert_eq!(client.version().await.unwrap(), name_and_version());
    }

    #[tokio::test]
    async fn connect_rejects_other_versions() {
        let router = Router::new().route(
            "/_version",
            get(|| async { Json(json!({"version": "vogon 0.0.0-other"})) }),
        );
        let uri = spawn(router).await;
        match Client::connect(&uri).await {
            Err(SdkError::UnsupportedVersion { server, .. }) => {
                assert_eq!(server, "vogon 0.0.0-other")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn write_get_delete() {
        let client = Client::connect(&spawn_server().await).await.unwrap();
        assert!(client.get_object("one").await.unwrap().is_none());

        let created = client
            .write_object(&object("one", 1), WriteMode::Create)
            .await
            .unwrap();
        let stored = client.get_object("one").await.unwrap().unwrap();
        assert_eq!(stored.spec["n"], 1);
        assert_eq!(MetadataResponse::from(&stored.metadata), created);

        let deleted = client
            .delete_object("one", &created.id, &created.revision)
            .await
            .unwrap();
        assert_eq!(deleted, created);
        assert!(client.get_object("one").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_modes() {
        let client = Client::connect(&spawn_server().await).await.unwrap();

        let err = client
            .write_object(&object("one", 1), WriteMode::Replace)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));

        client
            .write_object(&object("one", 1), WriteMode::CreateOrReplace)
            .await
            .unwrap();
        let err = client
            .write_object(&object("one", 2), WriteMode::Create)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        match err {
            SdkError::Server { message, .. } => {
                assert_eq!(message, "object one already exists, cannot create")
            }
            other => panic!("unexpected error: {other}"),
        }

        client
            .write_object(&object("one", 3), WriteMode::Replace)
            .await
            .unwrap();
        let stored = client.get_object("one").await.unwrap().unwrap();
        assert_eq!(stored.spec["n"], 3);
    }

    #[tokio::test]
    async fn stale_preconditions_conflict() {
        let client = Client::connect(&spawn_server().await).await.unwrap();
        let first = client
            .write_object(&object("one", 1), WriteMode::Create)
            .await
            .unwrap();
        client
            .write_object(&object("one", 2), WriteMode::Replace)
            .await
            .unwrap();

        let stale = object("one", 3).with_precondition(first.id.clone(), first.revision.clone());
        let err = client
            .write_object(&stale, WriteMode::Replace)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let err = client
            .delete_object("one", &first.id, &first.revision)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Same lineage, no revision: unconditional on revision.
        client.delete_object("one", &first.id, "").await.unwrap();
    }

    #[tokio::test]
    async fn https_uris_attempt_a_tls_handshake() {
        // A plain TCP peer that closes immediately: the request must fail
        // during the TLS handshake, not because the scheme is unsupported.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        let client = Client::new(&format!("https://{addr}")).unwrap();
        match client.version().await {
            Err(SdkError::Http(e)) => {
                let detail = format!("{e:?}");
                assert!(!detail.contains("scheme is not http"), "{detail}");
                assert!(!e.is_builder(), "{detail}");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_names_are_rejected_locally() {
        let client = Client::new("http://127.0.0.1:1").unwrap();
        assert!(matches!(
            client.get_object("Bad Name").await,
            Err(SdkError::InvalidName(_))
        ));
    }
}
