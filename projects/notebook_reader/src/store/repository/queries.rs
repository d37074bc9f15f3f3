use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use crate::store::repository::models::{
    NewRepository, RepositoryRecord, RepositoryUpdate, SortDirection, SortField, SortSpec,
};

/// Strategy for assigning repository ids, injected into the store at
/// construction.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Monotonic counter starting at 1. Ids are never reused, deletions
/// included.
pub struct SequenceIds {
    next: AtomicU64,
}

impl SequenceIds {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequenceIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

/// Random v4 ids, for deployments that cannot keep a process-wide counter.
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// The persistence seam. A durable backing store can replace the in-memory
/// implementation without touching callers.
pub trait RepositoryStore: Send + Sync {
    fn find_all(&self, sort: SortSpec) -> Vec<RepositoryRecord>;
    fn find_by_id(&self, id: &str) -> Option<RepositoryRecord>;
    fn create(&self, new: NewRepository) -> RepositoryRecord;
    fn update(&self, id: &str, update: RepositoryUpdate) -> Option<RepositoryRecord>;
    fn delete(&self, id: &str) -> Option<RepositoryRecord>;
}

/// Process-lifetime store. Every operation takes the lock exactly once.
pub struct InMemoryRepositoryStore {
    repositories: Mutex<Vec<RepositoryRecord>>,
    ids: Box<dyn IdGenerator>,
}

impl InMemoryRepositoryStore {
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            repositories: Mutex::new(Vec::new()),
            ids,
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<RepositoryRecord>> {
        self.repositories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl RepositoryStore for InMemoryRepositoryStore {
    fn find_all(&self, sort: SortSpec) -> Vec<RepositoryRecord> {
        let mut records = self.guard().clone();

        records.sort_by(|a, b| {
            let ordering = match sort.field {
                SortField::CreatedDate => a.created_date.cmp(&b.created_date),
            };

            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        records
    }

    fn find_by_id(&self, id: &str) -> Option<RepositoryRecord> {
        self.guard().iter().find(|record| record.id == id).cloned()
    }

    fn create(&self, new: NewRepository) -> RepositoryRecord {
        let record = RepositoryRecord {
            id: self.ids.next_id(),
            repo_url: new.repo_url,
            repo_name: new.repo_name,
            notebooks: new.notebooks,
            created_date: Utc::now(),
        };

        self.guard().push(record.clone());
        record
    }

    fn update(&self, id: &str, update: RepositoryUpdate) -> Option<RepositoryRecord> {
        let mut records = self.guard();
        let record = records.iter_mut().find(|record| record.id == id)?;

        if let Some(repo_url) = update.repo_url {
            record.repo_url = repo_url;
        }
        if let Some(repo_name) = update.repo_name {
            record.repo_name = repo_name;
        }
        if let Some(notebooks) = update.notebooks {
            record.notebooks = notebooks;
        }

        Some(record.clone())
    }

    fn delete(&self, id: &str) -> Option<RepositoryRecord> {
        let mut records = self.guard();
        let index = records.iter().position(|record| record.id == id)?;
        Some(records.remove(index))
    }
}
