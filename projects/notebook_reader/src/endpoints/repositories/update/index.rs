use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use thiserror::Error;

use crate::store::repository::models::RepositoryUpdate;
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

/// Axum handler: PUT /api/repositories/{id}
///
/// Shallow merge; fields absent from the body keep their stored value.
pub async fn handler(
    Extension(store): Extension<DynRepositoryStore>,
    Path(id): Path<String>,
    Json(update): Json<RepositoryUpdate>,
) -> impl IntoResponse {
    match store.update(&id, update) {
        Some(repository) => Json(repository).into_response(),
        None => HandlerError::RepositoryNotFound.into_response(),
    }
}
