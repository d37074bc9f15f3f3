use std::sync::Arc;

use async_trait::async_trait;
use interfaces_github_notebooks::index::{FindNotebooksError, GitHubNotebookClient, Notebook};

/// Seam over notebook discovery so handlers and tests can substitute the
/// GitHub-backed implementation.
#[async_trait]
pub trait NotebookLookup: Send + Sync {
    async fn find_notebooks(&self, repo_url: &str) -> Result<Vec<Notebook>, FindNotebooksError>;
}

#[async_trait]
impl NotebookLookup for GitHubNotebookClient {
    async fn find_notebooks(&self, repo_url: &str) -> Result<Vec<Notebook>, FindNotebooksError> {
        GitHubNotebookClient::find_notebooks(self, repo_url).await
    }
}

/// Shared handle handlers receive through an `Extension` layer.
pub type DynNotebookLookup = Arc<dyn NotebookLookup>;
