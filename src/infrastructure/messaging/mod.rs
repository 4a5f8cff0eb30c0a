pub mod indexing_worker;
pub mod mpsc_indexing_queue;

pub use indexing_worker::IndexingWorker;
pub use mpsc_indexing_queue::{IndexingTaskReceiver, MpscIndexingQueue};
