use std::str::FromStr;

use chrono::{DateTime, Utc};
use interfaces_github_notebooks::index::Notebook;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One imported GitHub repository with its discovered notebooks.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryRecord {
    pub id: String,
    pub repo_url: String,
    pub repo_name: String,
    pub notebooks: Vec<Notebook>,
    pub created_date: DateTime<Utc>,
}

/// Creation payload; the store assigns `id` and `created_date`.
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub repo_url: String,
    pub repo_name: String,
    pub notebooks: Vec<Notebook>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryUpdate {
    pub repo_url: Option<String>,
    pub repo_name: Option<String>,
    pub notebooks: Option<Vec<Notebook>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// `-created_date`: newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedDate,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseSortSpecError {
    #[error("Unsupported sort field: {field}")]
    UnknownField { field: String },
}

impl FromStr for SortSpec {
    type Err = ParseSortSpecError;

    /// A leading `-` selects descending order, `-created_date` style.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (direction, field) = match value.strip_prefix('-') {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, value),
        };

        match field {
            "created_date" => Ok(Self {
                field: SortField::CreatedDate,
                direction,
            }),
            other => Err(ParseSortSpecError::UnknownField {
                field: other.to_string(),
            }),
        }
    }
}
