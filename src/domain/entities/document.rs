use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DocumentMetadata, DocumentStatus};

/// A persisted document record. The id is assigned by the store at creation
/// and is never reused, even after deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: i32,
    file_name: String,
    file_path: String,
    file_size: i64,
    file_hash: Option<String>,
    metadata: DocumentMetadata,
    status: DocumentStatus,
    chunk_count: Option<i32>,
    uploaded_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Fields for a document that has not been persisted yet; the store assigns
/// the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_hash: Option<String>,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn from_parts(
        id: i32,
        file_name: String,
        file_path: String,
        file_size: i64,
        file_hash: Option<String>,
        metadata: DocumentMetadata,
        status: DocumentStatus,
        chunk_count: Option<i32>,
        uploaded_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_name,
            file_path,
            file_size,
            file_hash,
            metadata,
            status,
            chunk_count,
            uploaded_at,
            updated_at,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn file_hash(&self) -> Option<&str> {
        self.file_hash.as_deref()
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn status(&self) -> &DocumentStatus {
        &self.status
    }

    pub fn chunk_count(&self) -> Option<i32> {
        self.chunk_count
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Display title: extracted title when present, file name otherwise.
    pub fn title(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .unwrap_or(&self.file_name)
    }

    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    pub fn start_indexing(&mut self) -> Result<(), String> {
        self.transition_to(DocumentStatus::Indexing)
    }

    pub fn complete_indexing(&mut self, chunk_count: i32) -> Result<(), String> {
        self.transition_to(DocumentStatus::Ready)?;
        self.chunk_count = Some(chunk_count);
        Ok(())
    }

    pub fn fail_indexing(&mut self, reason: String) -> Result<(), String> {
        self.transition_to(DocumentStatus::Failed(reason))
    }

    fn transition_to(&mut self, new_status: DocumentStatus) -> Result<(), String> {
        if !self.status.can_transition_to(&new_status) {
            return Err(format!(
                "Invalid status transition: {} -> {}",
                self.status, new_status
            ));
        }
        self.status = new_status;
        self.updated_at = Utc::now();
        Ok(())
    }
}
