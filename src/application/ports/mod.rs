pub mod completion_provider;
pub mod embedding_provider;
pub mod file_storage;
pub mod indexing_queue;
pub mod metadata_extractor;
pub mod text_extractor;
pub mod vector_index;

pub use completion_provider::CompletionProvider;
pub use embedding_provider::EmbeddingProvider;
pub use file_storage::FileStorage;
pub use indexing_queue::IndexingQueue;
pub use metadata_extractor::MetadataExtractor;
pub use text_extractor::TextExtractor;
pub use vector_index::VectorIndex;
