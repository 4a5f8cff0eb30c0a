use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Work item handed from the upload path to the background indexing worker.
/// Status lives on the document record, not here.
#[derive(Debug, Clone)]
pub struct IndexingTask {
    pub task_id: Uuid,
    pub document_id: i32,
    pub file_id: Uuid,
    pub queued_at: DateTime<Utc>,
}

impl IndexingTask {
    pub fn new(document_id: i32, file_id: Uuid) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            document_id,
            file_id,
            queued_at: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub enum IndexingQueueError {
    QueueClosed,
}

impl std::fmt::Display for IndexingQueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingQueueError::QueueClosed => write!(f, "Indexing queue is closed"),
        }
    }
}

impl std::error::Error for IndexingQueueError {}

#[async_trait]
pub trait IndexingQueue: Send + Sync {
    async fn enqueue(&self, task: IndexingTask) -> Result<(), IndexingQueueError>;

    async fn size(&self) -> usize;
}
