use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use interfaces_github_notebooks::index::{FetchLimits, GitHubNotebookClient};
use projects_notebook_reader::config::Config;
use projects_notebook_reader::lookup::DynNotebookLookup;
use projects_notebook_reader::router::router;
use projects_notebook_reader::store::repository::queries::{InMemoryRepositoryStore, SequenceIds};
use projects_notebook_reader::store::DynRepositoryStore;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	},
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	dotenvy::dotenv().ok();

	utils_trace::init("info")
		.map_err(|source| MainError::TracingInit { source })?;

	let config = Config::from_env();
	info!(
		token_configured = config.github_token.is_some(),
		max_notebooks = config.max_notebooks,
		"starting notebook reader"
	);

	let store: DynRepositoryStore =
		Arc::new(InMemoryRepositoryStore::new(Box::new(SequenceIds::new())));
	let lookup: DynNotebookLookup = Arc::new(GitHubNotebookClient::new(
		config.github_token.clone(),
		FetchLimits {
			max_notebooks: config.max_notebooks,
			fetch_delay: config.fetch_delay,
		},
	));

	// Set up the router
	let app = router(config.clone(), store, lookup);

	let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
	let listener = tokio::net::TcpListener::bind(addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", addr);

	axum::serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
