use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::store::repository::models::{ParseSortSpecError, SortSpec};
use crate::store::DynRepositoryStore;

/// Query parameters accepted by the endpoint.
#[derive(Deserialize)]
pub struct RepositoriesListQuery {
    sort: Option<String>,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    ParseSortSpec {
        #[from]
        source: ParseSortSpecError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            HandlerError::ParseSortSpec { source } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": source.to_string() })),
            )
                .into_response(),
        }
    }
}

/// Axum handler: GET /api/repositories
pub async fn handler(
    Extension(store): Extension<DynRepositoryStore>,
    Query(query): Query<RepositoriesListQuery>,
) -> impl IntoResponse {
    let sort = match query.sort.as_deref() {
        Some(value) => match value.parse::<SortSpec>() {
            Ok(sort) => sort,
            Err(source) => return HandlerError::ParseSortSpec { source }.into_response(),
        },
        None => SortSpec::default(),
    };

    Json(store.find_all(sort)).into_response()
}
