use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::lookup::DynNotebookLookup;

/// Query parameters accepted by the endpoint.
#[derive(Deserialize)]
pub struct TestGitHubQuery {
    repo: Option<String>,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("repo parameter is required")]
    MissingRepo,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Axum handler: GET /api/test-github?repo=owner/repo
///
/// Diagnostic probe. Runs the lookup without persisting anything and
/// reports the outcome either way.
pub async fn handler(
    Extension(lookup): Extension<DynNotebookLookup>,
    Query(query): Query<TestGitHubQuery>,
) -> impl IntoResponse {
    let repo = match query.repo.filter(|repo| !repo.is_empty()) {
        Some(repo) => repo,
        None => return HandlerError::MissingRepo.into_response(),
    };

    info!(repository = %repo, "github lookup probe");

    let result = match lookup
        .find_notebooks(&format!("https://github.com/{repo}"))
        .await
    {
        Ok(notebooks) => json!({ "notebooks": notebooks }),
        Err(source) => json!({ "notebooks": [], "error": source.to_string() }),
    };

    Json(json!({ "repo": repo, "result": result })).into_response()
}
