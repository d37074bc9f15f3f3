use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::store::DynRepositoryStore;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Repository not found")]
    RepositoryNotFound,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Axum handler: DELETE /api/repositories/{id}
pub async fn handler(
    Extension(store): Extension<DynRepositoryStore>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match store.delete(&id) {
        Some(repository) => {
            info!(id = %repository.id, repository = %repository.repo_name, "repository deleted");
            Json(json!({ "message": "Repository deleted successfully" })).into_response()
        }
        None => HandlerError::RepositoryNotFound.into_response(),
    }
}
