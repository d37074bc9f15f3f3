use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::endpoints;
use crate::lookup::DynNotebookLookup;
use crate::store::DynRepositoryStore;

/// Notebook payloads routinely exceed axum's default 2 MB body limit.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// The full API surface. Shared by the binary and the integration tests.
pub fn router(config: Config, store: DynRepositoryStore, lookup: DynNotebookLookup) -> Router {
    Router::new()
        .route(
            "/api/repositories",
            get(endpoints::repositories::list::index::handler)
                .post(endpoints::repositories::create::index::handler),
        )
        .route(
            "/api/repositories/{id}",
            get(endpoints::repositories::read::index::handler)
                .put(endpoints::repositories::update::index::handler)
                .delete(endpoints::repositories::delete::index::handler),
        )
        .route(
            "/api/notebooks/{repo_id}",
            get(endpoints::notebooks::list::index::handler),
        )
        .route(
            "/api/notebooks/{repo_id}/{notebook_path}",
            get(endpoints::notebooks::read::index::handler),
        )
        .route("/api/health", get(endpoints::health::index::handler))
        .route(
            "/api/test-github",
            get(endpoints::github::test_lookup::index::handler),
        )
        .layer(Extension(config))
        .layer(Extension(store))
        .layer(Extension(lookup))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
