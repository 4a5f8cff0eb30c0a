use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, mpsc};

use crate::application::ports::indexing_queue::{IndexingQueue, IndexingQueueError, IndexingTask};

/// In-process task queue between the upload path and the indexing worker.
/// Tasks are lost on restart; the records they referenced stay `uploaded`
/// and can be re-submitted.
pub struct MpscIndexingQueue {
    sender: mpsc::UnboundedSender<IndexingTask>,
    depth: Arc<AtomicUsize>,
}

/// Receiving half handed to the background worker.
pub struct IndexingTaskReceiver {
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<IndexingTask>>>,
    depth: Arc<AtomicUsize>,
}

impl MpscIndexingQueue {
    pub fn create_pair() -> (Self, IndexingTaskReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let depth = Arc::new(AtomicUsize::new(0));

        let queue = Self {
            sender,
            depth: depth.clone(),
        };
        let task_receiver = IndexingTaskReceiver {
            receiver: Arc::new(Mutex::new(receiver)),
            depth,
        };

        (queue, task_receiver)
    }
}

#[async_trait]
impl IndexingQueue for MpscIndexingQueue {
    async fn enqueue(&self, task: IndexingTask) -> Result<(), IndexingQueueError> {
        self.sender
            .send(task)
            .map_err(|_| IndexingQueueError::QueueClosed)?;
        self.depth.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn size(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }
}

impl IndexingTaskReceiver {
    /// Next task, or None when every sender is gone.
    pub async fn recv(&self) -> Option<IndexingTask> {
        let task = {
            let mut receiver = self.receiver.lock().await;
            receiver.recv().await
        };
        if task.is_some() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
        }
        task
    }
}
