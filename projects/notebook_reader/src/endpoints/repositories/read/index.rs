use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;

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

/// Axum handler: GET /api/repositories/{id}
pub async fn handler(
    Extension(store): Extension<DynRepositoryStore>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match store.find_by_id(&id) {
        Some(repository) => Json(repository).into_response(),
        None => HandlerError::RepositoryNotFound.into_response(),
    }
}
