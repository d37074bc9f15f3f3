use std::env;
use std::time::Duration;

/// Service configuration, read from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the HTTP server binds.
    pub port: u16,
    /// Optional GitHub token; unauthenticated requests hit much lower
    /// rate limits.
    pub github_token: Option<String>,
    /// Cap on notebook files fetched per import.
    pub max_notebooks: usize,
    /// Pause between raw-file fetches.
    pub fetch_delay: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(3001),
            github_token: env::var("GITHUB_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            max_notebooks: env::var("MAX_NOTEBOOKS_TO_PROCESS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(15),
            fetch_delay: Duration::from_millis(
                env::var("NOTEBOOK_FETCH_DELAY_MS")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }
}
