//! Router-level tests for the repository/notebook API.
//!
//! Notebook discovery is stubbed behind the `NotebookLookup` trait, so no
//! network access is involved and the store starts empty for every test.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use interfaces_github_notebooks::index::{FindNotebooksError, Notebook};
use projects_notebook_reader::config::Config;
use projects_notebook_reader::lookup::NotebookLookup;
use projects_notebook_reader::router::router;
use projects_notebook_reader::store::repository::queries::{
    InMemoryRepositoryStore, SequenceIds,
};

/// Returns its canned notebooks, or the discovery error a notebook-less
/// repository produces.
struct StubLookup {
    notebooks: Vec<Notebook>,
}

#[async_trait]
impl NotebookLookup for StubLookup {
    async fn find_notebooks(&self, _repo_url: &str) -> Result<Vec<Notebook>, FindNotebooksError> {
        if self.notebooks.is_empty() {
            return Err(FindNotebooksError::NoNotebooksFound);
        }

        Ok(self.notebooks.clone())
    }
}

fn sample_notebooks() -> Vec<Notebook> {
    let content = json!({
        "cells": [{"cell_type": "markdown", "source": ["# Demo"]}],
        "nbformat": 4
    });

    vec![
        Notebook {
            name: "intro.ipynb".to_string(),
            path: "intro.ipynb".to_string(),
            content: content.clone(),
        },
        Notebook {
            name: "analysis.ipynb".to_string(),
            path: "docs/analysis.ipynb".to_string(),
            content: content.clone(),
        },
        Notebook {
            name: "results.ipynb".to_string(),
            path: "docs/results.ipynb".to_string(),
            content,
        },
    ]
}

fn test_config() -> Config {
    Config {
        port: 0,
        github_token: None,
        max_notebooks: 15,
        fetch_delay: Duration::ZERO,
    }
}

fn app(notebooks: Vec<Notebook>) -> Router {
    let store = Arc::new(InMemoryRepositoryStore::new(Box::new(SequenceIds::new())));
    router(test_config(), store, Arc::new(StubLookup { notebooks }))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn import(app: &Router, repo_url: &str) -> Result<Value> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/repositories",
            json!({ "repo_url": repo_url }),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await
}

#[tokio::test]
async fn import_returns_the_persisted_record() -> Result<()> {
    let app = app(sample_notebooks());

    let record = import(&app, "https://github.com/acme/demo").await?;

    assert_eq!(record["id"], "1");
    assert_eq!(record["repo_url"], "https://github.com/acme/demo");
    assert_eq!(record["repo_name"], "acme/demo");
    assert_eq!(record["notebooks"].as_array().unwrap().len(), 3);
    assert!(record["created_date"].is_string());
    Ok(())
}

#[tokio::test]
async fn imported_repository_is_listed_and_notebooks_are_retrievable() -> Result<()> {
    let app = app(sample_notebooks());
    let record = import(&app, "https://github.com/acme/demo").await?;
    let id = record["id"].as_str().unwrap();

    let response = app.clone().oneshot(get("/api/repositories")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = read_json(response).await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], *id);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/notebooks/{id}")))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let notebooks = read_json(response).await?;
    assert_eq!(notebooks.as_array().unwrap().len(), 3);

    // The notebook path travels URL-encoded as one segment.
    let response = app
        .clone()
        .oneshot(get(&format!("/api/notebooks/{id}/docs%2Fanalysis.ipynb")))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let notebook = read_json(response).await?;
    assert_eq!(notebook["path"], "docs/analysis.ipynb");
    assert_eq!(notebook["content"]["nbformat"], 4);
    Ok(())
}

#[tokio::test]
async fn import_honors_a_caller_supplied_name() -> Result<()> {
    let app = app(sample_notebooks());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/repositories",
            json!({ "repo_url": "https://github.com/acme/demo", "repo_name": "My Notebooks" }),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    let record = read_json(response).await?;
    assert_eq!(record["repo_name"], "My Notebooks");
    Ok(())
}

#[tokio::test]
async fn import_without_a_url_is_rejected() -> Result<()> {
    let app = app(sample_notebooks());

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/repositories", json!({})))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await?;
    assert_eq!(body["error"], "Repository URL is required");
    Ok(())
}

#[tokio::test]
async fn import_with_a_malformed_url_is_rejected() -> Result<()> {
    let app = app(sample_notebooks());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/repositories",
            json!({ "repo_url": "https://example.com/acme/demo" }),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await?;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid GitHub URL"));
    Ok(())
}

#[tokio::test]
async fn failed_import_persists_nothing() -> Result<()> {
    let app = app(Vec::new());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/repositories",
            json!({ "repo_url": "https://github.com/acme/empty" }),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await?;
    assert_eq!(body["error"], "No Jupyter notebooks found in this repository");

    let response = app.clone().oneshot(get("/api/repositories")).await?;
    let listed = read_json(response).await?;
    assert_eq!(listed.as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn listing_sorts_by_created_date() -> Result<()> {
    let app = app(sample_notebooks());
    import(&app, "https://github.com/acme/first").await?;
    import(&app, "https://github.com/acme/second").await?;

    let response = app.clone().oneshot(get("/api/repositories")).await?;
    let newest_first = read_json(response).await?;
    assert_eq!(newest_first[0]["id"], "2");
    assert_eq!(newest_first[1]["id"], "1");

    let response = app
        .clone()
        .oneshot(get("/api/repositories?sort=created_date"))
        .await?;
    let oldest_first = read_json(response).await?;
    assert_eq!(oldest_first[0]["id"], "1");

    let response = app
        .clone()
        .oneshot(get("/api/repositories?sort=name"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await?;
    assert_eq!(body["error"], "Unsupported sort field: name");
    Ok(())
}

#[tokio::test]
async fn update_merges_partial_fields() -> Result<()> {
    let app = app(sample_notebooks());
    let record = import(&app, "https://github.com/acme/demo").await?;
    let id = record["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/repositories/{id}"),
            json!({ "repo_name": "renamed" }),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await?;
    assert_eq!(updated["repo_name"], "renamed");
    assert_eq!(updated["repo_url"], "https://github.com/acme/demo");
    assert_eq!(updated["notebooks"].as_array().unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn unknown_ids_yield_not_found() -> Result<()> {
    let app = app(sample_notebooks());

    let response = app.clone().oneshot(get("/api/repositories/99")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/repositories/99",
            json!({ "repo_name": "renamed" }),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(get("/api/notebooks/99")).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get("/api/notebooks/99/intro.ipynb"))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_notebook_path_yields_not_found() -> Result<()> {
    let app = app(sample_notebooks());
    let record = import(&app, "https://github.com/acme/demo").await?;
    let id = record["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/notebooks/{id}/missing.ipynb")))
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await?;
    assert_eq!(body["error"], "Notebook not found");
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_record_and_missing_ids_are_reported() -> Result<()> {
    let app = app(sample_notebooks());
    let record = import(&app, "https://github.com/acme/demo").await?;
    let id = record["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("/api/repositories/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["message"], "Repository deleted successfully");

    let response = app
        .clone()
        .oneshot(
            Request::delete("/api/repositories/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(get("/api/repositories")).await?;
    let listed = read_json(response).await?;
    assert_eq!(listed.as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn health_reports_token_state() -> Result<()> {
    let app = app(Vec::new());

    let response = app.clone().oneshot(get("/api/health")).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["githubStatus"], "No GitHub token");
    Ok(())
}

#[tokio::test]
async fn lookup_probe_reports_both_outcomes() -> Result<()> {
    let succeeding = app(sample_notebooks());
    let failing = app(Vec::new());

    let response = succeeding
        .clone()
        .oneshot(get("/api/test-github?repo=acme/demo"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["repo"], "acme/demo");
    assert_eq!(body["result"]["notebooks"].as_array().unwrap().len(), 3);

    let response = failing
        .clone()
        .oneshot(get("/api/test-github?repo=acme/empty"))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await?;
    assert_eq!(body["result"]["notebooks"].as_array().unwrap().len(), 0);
    assert_eq!(
        body["result"]["error"],
        "No Jupyter notebooks found in this repository"
    );

    let response = succeeding.clone().oneshot(get("/api/test-github")).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
