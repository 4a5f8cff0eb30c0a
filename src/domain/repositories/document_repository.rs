use async_trait::async_trait;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::value_objects::DocumentStatus;

#[derive(Debug)]
pub enum DocumentRepositoryError {
    NotFound(i32),
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for DocumentRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRepositoryError::NotFound(id) => write!(f, "Document not found: {}", id),
            DocumentRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            DocumentRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for DocumentRepositoryError {}

/// Single source of truth for document identity and status. Only the
/// indexing pipeline and explicit delete mutate records; reads are always
/// permitted concurrently.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a new record with status `uploaded` and return it with its
    /// store-assigned id.
    async fn create(&self, new_document: NewDocument) -> Result<Document, DocumentRepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Newest-first listing (upload recency, ids break ties).
    async fn find_all(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    async fn count(&self) -> Result<i64, DocumentRepositoryError>;

    /// Update status (and the retained failure reason for `Failed`). Fails
    /// with `NotFound` when the record has been deleted.
    async fn update_status(
        &self,
        id: i32,
        status: DocumentStatus,
    ) -> Result<(), DocumentRepositoryError>;

    /// Record how many chunks indexing produced.
    async fn update_chunk_count(
        &self,
        id: i32,
        chunk_count: i32,
    ) -> Result<(), DocumentRepositoryError>;

    /// Returns false when no record existed (the caller maps this to a
    /// NotFound, keeping repeated deletes safe).
    async fn delete(&self, id: i32) -> Result<bool, DocumentRepositoryError>;
}
