pub mod repository;

use std::sync::Arc;

use crate::store::repository::queries::RepositoryStore;

/// Shared handle handlers receive through an `Extension` layer.
pub type DynRepositoryStore = Arc<dyn RepositoryStore>;
