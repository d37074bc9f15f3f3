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

    #[error("Notebook not found")]
    NotebookNotFound,
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

/// Axum handler: GET /api/notebooks/{repo_id}/{notebook_path}
///
/// The notebook path arrives URL-encoded as a single segment; axum decodes
/// it, slashes included.
pub async fn handler(
    Extension(store): Extension<DynRepositoryStore>,
    Path((repo_id, notebook_path)): Path<(String, String)>,
) -> impl IntoResponse {
    let repository = match store.find_by_id(&repo_id) {
        Some(repository) => repository,
        None => return HandlerError::RepositoryNotFound.into_response(),
    };

    match repository
        .notebooks
        .into_iter()
        .find(|notebook| notebook.path == notebook_path)
    {
        Some(notebook) => Json(notebook).into_response(),
        None => HandlerError::NotebookNotFound.into_response(),
    }
}
