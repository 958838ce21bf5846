use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use vogon_db::Database;

use crate::handler::{self, AppState};

/// Build the axum router serving the object API from `db`.
///
/// Request bodies are not size-limited. Every error, including unsupported
/// methods, is answered with a JSON `{"message": ...}` body.
pub fn build_router(db: Arc<dyn Database>) -> Router {
    Router::new()
        .route(
            "/",
            get(handler::welcome).fallback(handler::unsupported_method),
        )
        .route(
            "/_version",
            get(handler::version).fallback(handler::unsupported_method),
        )
        .route(
            "/*name",
            get(handler::get_object)
                .put(handler::put_object)
                .post(handler::post_object)
                .delete(handler::delete_object)
                .fallback(handler::unsupported_method),
        )
        .fallback(handler::invalid_path)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(db))
}
