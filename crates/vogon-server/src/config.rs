use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use vogon_db::{Database, FilesDatabase, InMemoryDatabase};

use crate::error::{ServerError, ServerResult};

/// API server configuration, read from a TOML file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    pub database: DatabaseConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Configuration with default listen settings and the given backend.
    pub fn new(database: DatabaseConfig) -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
            database,
        }
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
            .map_err(|e| ServerError::Config(format!("invalid config file {}: {e}", path.display())))
    }

    /// Parse a TOML configuration document.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Storage backend selection, the `[database]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum DatabaseConfig {
    /// Volatile, process-local storage.
    InMemory,
    /// One JSON file per object under `directory`.
    Files { directory: PathBuf },
    /// Accepted in configuration files, but cannot be connected to.
    Etcd {
        #[serde(default)]
        hostname: String,
        #[serde(default)]
        ca_cert: Option<PathBuf>,
        #[serde(default)]
        client_cert: Option<PathBuf>,
        #[serde(default)]
        client_key: Option<PathBuf>,
    },
}

impl DatabaseConfig {
    /// Open the configured backend.
    pub fn connect(&self) -> ServerResult<Arc<dyn Database>> {
        match self {
            Self::InMemory => {
                info!("using in-memory database");
                Ok(Arc::new(InMemoryDatabase::new_in_memory()))
            }
            Self::Files { directory } => {
                info!(directory = %directory.display(), "using files database");
                Ok(Arc::new(FilesDatabase::open(directory)?))
            }
            Self::Etcd { .. } => Err(ServerError::Config(
                "etcd backend is not implemented".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let c = ServerConfig::parse("[database]\ntype = \"in_memory\"\n").unwrap();
        assert_eq!(c, ServerConfig::new(DatabaseConfig::InMemory));
        assert_eq!(c.listen_addr, "127.0.0.1");
        assert_eq!(c.listen_port, 8080);
    }

    #[test]
    fn files_backend() {
        let c = ServerConfig::parse(
            r#"
            listen_addr = "0.0.0.0"
            listen_port = 9000

            [database]
            type = "files"
            directory = "/var/lib/vogon"
            "#,
        )
        .unwrap();
        assert_eq!(c.listen_addr, "0.0.0.0");
        assert_eq!(c.listen_port, 9000);
        assert_eq!(
            c.database,
            DatabaseConfig::Files {
                directory: "/var/lib/vogon".into()
            }
        );
    }

    #[test]
    fn etcd_backend_parses_but_cannot_connect() {
        let c = ServerConfig::parse(
            r#"
            [database]
            type = "etcd"
            hostname = "etcd.local:2379"
            ca_cert = "ca.pem"
            "#,
        )
        .unwrap();
        match &c.database {
            DatabaseConfig::Etcd {
                hostname, ca_cert, client_key, ..
            } => {
                assert_eq!(hostname, "etcd.local:2379");
                assert_eq!(ca_cert.as_deref(), Some(Path::new("ca.pem")));
                assert!(client_key.is_none());
            }
            other => panic!("unexpected backend: {other:?}"),
        }
        let err = c.database.connect().err().unwrap();
        assert_eq!(err.to_string(), "configuration error: etcd backend is not implemented");
    }

    #[test]
    fn etcd_fields_are_all_optional() {
        let c = ServerConfig::parse("[database]\ntype = \"etcd\"\n").unwrap();
        assert_eq!(
            c.database,
            DatabaseConfig::Etcd {
                hostname: String::new(),
                ca_cert: None,
                client_cert: None,
                client_key: None,
            }
        );
    }

    #[test]
    fn missing_or_unknown_type_is_rejected() {
        assert!(ServerConfig::parse("[database]\n").is_err());
        assert!(ServerConfig::parse("[database]\ntype = \"postgres\"\n").is_err());
        assert!(ServerConfig::parse("listen_port = 1\n").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ServerConfig::parse("colour = \"blue\"\n[database]\ntype = \"in_memory\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vogon.toml");
        fs::write(&path, "listen_port = 1234\n[database]\ntype = \"in_memory\"\n").unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap().listen_port, 1234);

        let err = ServerConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn connect_files_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let db = DatabaseConfig::Files {
            directory: data.clone(),
        }
        .connect()
        .unwrap();
        assert!(data.join("_lock").is_file());
        assert!(db.get("nothing").is_err());
    }
}
