use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use vogon_db::Database;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// Vogon API server.
pub struct ApiServer {
    config: ServerConfig,
    db: Arc<dyn Database>,
}

impl ApiServer {
    /// Create a server, connecting to the configured backend.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let db = config.database.connect()?;
        Ok(Self { config, db })
    }

    /// Create a server over an already-open database.
    pub fn with_database(config: ServerConfig, db: Arc<dyn Database>) -> Self {
        Self { config, db }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.db))
    }

    /// Bind the configured address and serve requests until interrupted.
    pub async fn serve(self) -> ServerResult<()> {
        let listener =
            TcpListener::bind((self.config.listen_addr.as_str(), self.config.listen_port)).await?;
        self.serve_on(listener).await
    }

    /// Serve requests on an already-bound listener until interrupted.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        info!("Vogon API server listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Vogon API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
