use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::application::services::DocumentIndexer;
use crate::application::services::document_indexer::IndexingError;
use crate::infrastructure::messaging::mpsc_indexing_queue::IndexingTaskReceiver;

/// Background loop that drains the indexing queue. One document at a time;
/// a failed document is marked `failed` by the indexer and the loop moves
/// on, so a single bad PDF never wedges the pipeline.
pub struct IndexingWorker {
    indexer: Arc<DocumentIndexer>,
    receiver: IndexingTaskReceiver,
}

impl IndexingWorker {
    pub fn new(indexer: Arc<DocumentIndexer>, receiver: IndexingTaskReceiver) -> Self {
        Self { indexer, receiver }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        info!("Indexing worker started");

        while let Some(task) = self.receiver.recv().await {
            info!(
                document_id = task.document_id,
                task_id = %task.task_id,
                "Indexing task dequeued"
            );

            match self
                .indexer
                .index_document(task.document_id, task.file_id)
                .await
            {
                Ok(()) => {}
                Err(IndexingError::DocumentGone(id)) => {
                    info!(document_id = id, "Document deleted mid-flight, task dropped");
                }
                Err(e) => {
                    error!(document_id = task.document_id, error = %e, "Indexing failed");
                }
            }
        }

        info!("Indexing worker stopped: queue closed");
    }
}
