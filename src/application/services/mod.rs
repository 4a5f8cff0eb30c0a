pub mod document_indexer;
pub mod prompt_builder;
pub mod retrieval_service;
pub mod text_chunker;

pub use document_indexer::DocumentIndexer;
pub use prompt_builder::PromptBuilder;
pub use retrieval_service::RetrievalService;
pub use text_chunker::TextChunker;
