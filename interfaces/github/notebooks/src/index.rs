use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";

const USER_AGENT: &str = "notebook-reader";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

static REPO_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com/([^/]+)/([^/]+)").expect("valid repo url regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
}

/// Pull `owner`/`repo` out of anything containing a `github.com/owner/repo`
/// segment. A trailing `.git` on the repo name is dropped.
pub fn extract_repo_info(url: &str) -> Result<RepoInfo, ExtractRepoInfoError> {
    let captures = REPO_URL_RE
        .captures(url)
        .ok_or_else(|| ExtractRepoInfoError::InvalidUrl {
            url: url.to_string(),
        })?;

    let repo = &captures[2];
    let repo = repo.strip_suffix(".git").unwrap_or(repo);

    Ok(RepoInfo {
        owner: captures[1].to_string(),
        repo: repo.to_string(),
    })
}

#[derive(Debug, Error)]
pub enum ExtractRepoInfoError {
    #[error("Invalid GitHub URL. Please use format: https://github.com/username/repository")]
    InvalidUrl { url: String },
}

/// A discovered notebook file with its parsed `.ipynb` JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub name: String,
    pub path: String,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoMetadata {
    pub full_name: String,
    pub default_branch: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeSearchItem {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Deserialize)]
struct CodeSearchResponse {
    #[serde(default)]
    items: Vec<CodeSearchItem>,
}

/// Bounds on the per-import fetch loop.
#[derive(Debug, Clone)]
pub struct FetchLimits {
    /// At most this many notebook files are fetched per import.
    pub max_notebooks: usize,
    /// Pause after each raw-file fetch, to stay under GitHub's secondary
    /// rate limits.
    pub fetch_delay: Duration,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_notebooks: 15,
            fetch_delay: Duration::from_millis(300),
        }
    }
}

pub struct GitHubNotebookClient {
    client: Client,
    token: Option<String>,
    api_base: String,
    raw_base: String,
    limits: FetchLimits,
}

impl GitHubNotebookClient {
    pub fn new(token: Option<String>, limits: FetchLimits) -> Self {
        Self::with_base_urls(token, limits, DEFAULT_API_BASE, DEFAULT_RAW_BASE)
    }

    /// Point the client at a different API/raw host. Used by tests to stand
    /// in for GitHub.
    pub fn with_base_urls(
        token: Option<String>,
        limits: FetchLimits,
        api_base: &str,
        raw_base: &str,
    ) -> Self {
        Self {
            client: Client::new(),
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
            limits,
        }
    }

    fn api_get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header("Accept", GITHUB_ACCEPT)
            .header("User-Agent", USER_AGENT);

        match &self.token {
            Some(token) => request.header("Authorization", format!("token {token}")),
            None => request,
        }
    }

    /// `GET /repos/:owner/:repo`. The default branch returned here is where
    /// raw notebook content is fetched from.
    pub async fn get_repo_info(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepoMetadata, FindNotebooksError> {
        let url = format!("{}/repos/{owner}/{repo}", self.api_base);

        let response = self
            .api_get(&url)
            .send()
            .await
            .map_err(|source| FindNotebooksError::RequestSend { source })?;

        check_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|source| FindNotebooksError::ResponseRead { source })?;

        serde_json::from_str(&body)
            .map_err(|source| FindNotebooksError::DeserializeResponseBody { source })
    }

    /// Code search scoped to the repository, filtered to the `ipynb`
    /// extension. Only the first result page is consulted.
    pub async fn search_notebooks(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<CodeSearchItem>, FindNotebooksError> {
        let url = format!(
            "{}/search/code?q=extension:ipynb+repo:{owner}/{repo}",
            self.api_base
        );

        let response = self
            .api_get(&url)
            .send()
            .await
            .map_err(|source| FindNotebooksError::RequestSend { source })?;

        check_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(|source| FindNotebooksError::ResponseRead { source })?;

        let parsed: CodeSearchResponse = serde_json::from_str(&body)
            .map_err(|source| FindNotebooksError::DeserializeResponseBody { source })?;

        Ok(parsed.items)
    }

    async fn fetch_notebook(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        item: &CodeSearchItem,
    ) -> Option<Notebook> {
        let url = format!("{}/{owner}/{repo}/{branch}/{}", self.raw_base, item.path);

        let response = match self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!(path = %item.path, status = %response.status(), "skipping notebook, fetch failed");
                return None;
            }
            Err(source) => {
                warn!(path = %item.path, error = %source, "skipping notebook, fetch failed");
                return None;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                warn!(path = %item.path, error = %source, "skipping notebook, body read failed");
                return None;
            }
        };

        match serde_json::from_str(&body) {
            Ok(content) => Some(Notebook {
                name: item.name.clone(),
                path: item.path.clone(),
                content,
            }),
            Err(source) => {
                warn!(path = %item.path, error = %source, "skipping notebook, content is not valid JSON");
                None
            }
        }
    }

    /// The whole discovery workflow: resolve the repository, search for
    /// `.ipynb` files, fetch and parse each one at the default branch.
    ///
    /// Individual files that fail to fetch or parse are skipped. Zero search
    /// matches and zero successfully parsed files are errors, so a caller
    /// never persists an empty import.
    pub async fn find_notebooks(&self, repo_url: &str) -> Result<Vec<Notebook>, FindNotebooksError> {
        let RepoInfo { owner, repo } = extract_repo_info(repo_url)?;

        let metadata = self.get_repo_info(&owner, &repo).await?;
        info!(repository = %metadata.full_name, branch = %metadata.default_branch, "repository resolved");

        let items = self.search_notebooks(&owner, &repo).await?;
        info!(matches = items.len(), "notebook search finished");

        if items.is_empty() {
            return Err(FindNotebooksError::NoNotebooksFound);
        }

        for item in items.iter().take(5) {
            debug!(path = %item.path, "notebook match");
        }

        let mut notebooks = Vec::new();
        for item in items.iter().take(self.limits.max_notebooks) {
            if let Some(notebook) = self
                .fetch_notebook(&owner, &repo, &metadata.default_branch, item)
                .await
            {
                notebooks.push(notebook);
            }

            tokio::time::sleep(self.limits.fetch_delay).await;
        }

        if notebooks.is_empty() {
            return Err(FindNotebooksError::NoneProcessed);
        }

        info!(processed = notebooks.len(), "notebooks fetched");
        Ok(notebooks)
    }
}

/// Map the status of a failed metadata/search call onto the user-facing
/// taxonomy. GitHub answers 403 for rate-limit exhaustion.
fn check_status(status: StatusCode) -> Result<(), FindNotebooksError> {
    if status == StatusCode::FORBIDDEN {
        return Err(FindNotebooksError::RateLimited);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(FindNotebooksError::RepoNotFound);
    }

    if !status.is_success() {
        return Err(FindNotebooksError::UnexpectedStatus { status });
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum FindNotebooksError {
    #[error(transparent)]
    InvalidUrl {
        #[from]
        source: ExtractRepoInfoError,
    },

    #[error("GitHub API rate limit exceeded. Please try again later or add a GitHub Personal Access Token.")]
    RateLimited,

    #[error("Repository not found or access denied. Make sure the repository exists and is public.")]
    RepoNotFound,

    #[error("No Jupyter notebooks found in this repository")]
    NoNotebooksFound,

    #[error("Found notebook files but could not process any of them. This might be due to file size limits or parsing errors.")]
    NoneProcessed,

    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody { source: serde_json::Error },

    #[error("UnexpectedStatus: {status}")]
    UnexpectedStatus { status: StatusCode },
}
