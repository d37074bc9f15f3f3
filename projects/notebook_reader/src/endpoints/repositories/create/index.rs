use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use interfaces_github_notebooks::index::{
    extract_repo_info, ExtractRepoInfoError, FindNotebooksError,
};

use crate::lookup::{DynNotebookLookup, NotebookLookup};
use crate::store::repository::models::{NewRepository, RepositoryRecord};
use crate::store::repository::queries::RepositoryStore;
use crate::store::DynRepositoryStore;

/// JSON payload expected by the endpoint.
#[derive(Deserialize)]
pub struct RepositoryCreateRequestBody {
    repo_url: Option<String>,
    repo_name: Option<String>,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Repository URL is required")]
    MissingRepoUrl,

    #[error(transparent)]
    ImportRepository {
        #[from]
        source: ImportRepositoryError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

/// Axum handler: POST /api/repositories
pub async fn handler(
    Extension(store): Extension<DynRepositoryStore>,
    Extension(lookup): Extension<DynNotebookLookup>,
    Json(input): Json<RepositoryCreateRequestBody>,
) -> impl IntoResponse {
    let repo_url = match input.repo_url.filter(|url| !url.is_empty()) {
        Some(url) => url,
        None => return HandlerError::MissingRepoUrl.into_response(),
    };

    match import_repository(store.as_ref(), lookup.as_ref(), repo_url, input.repo_name).await {
        Ok(repository) => (StatusCode::CREATED, Json(repository)).into_response(),
        Err(source) => {
            error!(error = %source, "repository import failed");
            HandlerError::ImportRepository { source }.into_response()
        }
    }
}

#[derive(Debug, Error)]
pub enum ImportRepositoryError {
    #[error(transparent)]
    InvalidRepoUrl {
        #[from]
        source: ExtractRepoInfoError,
    },

    #[error(transparent)]
    FindNotebooks {
        #[from]
        source: FindNotebooksError,
    },

    #[error("No Jupyter notebooks found in this repository")]
    NoNotebooks,
}

/// The import workflow: resolve a display name, discover notebooks, persist.
/// Either a record with at least one notebook is stored or nothing is.
pub async fn import_repository(
    store: &dyn RepositoryStore,
    lookup: &dyn NotebookLookup,
    repo_url: String,
    repo_name: Option<String>,
) -> Result<RepositoryRecord, ImportRepositoryError> {
    let info = extract_repo_info(&repo_url)?;
    let repo_name = repo_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("{}/{}", info.owner, info.repo));

    info!(repository = %repo_name, "importing repository");

    let notebooks = lookup.find_notebooks(&repo_url).await?;
    if notebooks.is_empty() {
        return Err(ImportRepositoryError::NoNotebooks);
    }

    info!(repository = %repo_name, notebooks = notebooks.len(), "notebooks discovered");

    Ok(store.create(NewRepository {
        repo_url,
        repo_name,
        notebooks,
    }))
}
