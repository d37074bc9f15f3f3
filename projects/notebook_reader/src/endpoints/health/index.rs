use axum::{extract::Extension, response::IntoResponse, Json};
use serde::Serialize;

use crate::config::Config;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    #[serde(rename = "githubStatus")]
    pub github_status: String,
}

/// Axum handler: GET /api/health
pub async fn handler(Extension(config): Extension<Config>) -> impl IntoResponse {
    let github_status = if config.github_token.is_some() {
        "Token configured"
    } else {
        "No GitHub token"
    };

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Jupyter Notebook Reader API is running".to_string(),
        github_status: github_status.to_string(),
    })
}
