use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::embedding_provider::EmbeddingProvider;
use crate::application::ports::file_storage::FileStorage;
use crate::application::ports::text_extractor::TextExtractor;
use crate::application::ports::vector_index::{EmbeddedChunk, VectorIndex};
use crate::application::services::text_chunker::TextChunker;
use crate::domain::entities::DocumentChunk;
use crate::domain::repositories::DocumentRepository;
use crate::domain::repositories::document_repository::DocumentRepositoryError;
use crate::domain::value_objects::DocumentStatus;

const EMBEDDING_BATCH_SIZE: usize = 16;

#[derive(Debug)]
pub enum IndexingError {
    DocumentGone(i32),
    ExtractionFailed(String),
    EmbeddingFailed(String),
    IndexWriteFailed(String),
    StorageFailed(String),
    RepositoryError(String),
}

impl std::fmt::Display for IndexingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexingError::DocumentGone(id) => {
                write!(f, "Document {} was deleted before indexing finished", id)
            }
            IndexingError::ExtractionFailed(msg) => write!(f, "Text extraction failed: {}", msg),
            IndexingError::EmbeddingFailed(msg) => write!(f, "Embedding failed: {}", msg),
            IndexingError::IndexWriteFailed(msg) => write!(f, "Vector indexing failed: {}", msg),
            IndexingError::StorageFailed(msg) => write!(f, "File storage failed: {}", msg),
            IndexingError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for IndexingError {}

/// Drives one document through `uploaded/failed -> indexing -> ready|failed`:
/// extract per-page text, chunk it, embed the chunks in batches, and write
/// them to the vector index. The document record is the only status
/// authority; when it disappears mid-flight the pipeline abandons the task
/// without recreating anything.
pub struct DocumentIndexer {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    text_extractor: Arc<dyn TextExtractor>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    chunker: TextChunker,
}

impl DocumentIndexer {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        text_extractor: Arc<dyn TextExtractor>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        chunker: TextChunker,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            text_extractor,
            embedding_provider,
            vector_index,
            chunker,
        }
    }

    pub async fn index_document(&self, document_id: i32, file_id: Uuid) -> Result<(), IndexingError> {
        self.set_status(document_id, DocumentStatus::Indexing).await?;

        match self.run_pipeline(document_id, file_id).await {
            Ok(chunk_count) => {
                if let Err(e) = self
                    .document_repository
                    .update_chunk_count(document_id, chunk_count)
                    .await
                {
                    warn!(document_id, error = %e, "Failed to record chunk count");
                }
                self.set_status(document_id, DocumentStatus::Ready).await?;
                info!(document_id, chunk_count, "Document indexed");
                Ok(())
            }
            Err(IndexingError::DocumentGone(id)) => Err(IndexingError::DocumentGone(id)),
            Err(e) => {
                let failed = DocumentStatus::Failed(e.to_string());
                // Best effort: the document may have been deleted meanwhile.
                match self.document_repository.update_status(document_id, failed).await {
                    Ok(()) | Err(DocumentRepositoryError::NotFound(_)) => {}
                    Err(repo_err) => {
                        warn!(document_id, error = %repo_err, "Failed to record indexing failure")
                    }
                }
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self, document_id: i32, file_id: Uuid) -> Result<i32, IndexingError> {
        let pdf_bytes = self
            .file_storage
            .retrieve_file(file_id)
            .await
            .map_err(|e| IndexingError::StorageFailed(e.to_string()))?;

        let pages = self
            .text_extractor
            .extract_pages(&pdf_bytes)
            .await
            .map_err(|e| IndexingError::ExtractionFailed(e.to_string()))?;

        let chunks = self.chunker.chunk_pages(document_id, &pages);
        if chunks.is_empty() {
            return Err(IndexingError::ExtractionFailed(
                "No chunks generated from extracted text".to_string(),
            ));
        }

        let embedded = self.embed_chunks(&chunks).await?;

        self.vector_index
            .index_chunks(document_id, &embedded)
            .await
            .map_err(|e| IndexingError::IndexWriteFailed(e.to_string()))?;

        Ok(embedded.len() as i32)
    }

    async fn embed_chunks(
        &self,
        chunks: &[DocumentChunk],
    ) -> Result<Vec<EmbeddedChunk>, IndexingError> {
        let mut embedded = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBEDDING_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.content().to_string()).collect();
            let vectors = self
                .embedding_provider
                .embed(&texts)
                .await
                .map_err(|e| IndexingError::EmbeddingFailed(e.to_string()))?;

            if vectors.len() != batch.len() {
                return Err(IndexingError::EmbeddingFailed(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }

            for (chunk, embedding) in batch.iter().zip(vectors) {
                embedded.push(EmbeddedChunk {
                    chunk_index: chunk.chunk_index(),
                    page_number: chunk.page_number(),
                    content: chunk.content().to_string(),
                    embedding,
                });
            }
        }

        Ok(embedded)
    }

    async fn set_status(
        &self,
        document_id: i32,
        status: DocumentStatus,
    ) -> Result<(), IndexingError> {
        match self.document_repository.update_status(document_id, status).await {
            Ok(()) => Ok(()),
            Err(DocumentRepositoryError::NotFound(id)) => Err(IndexingError::DocumentGone(id)),
            Err(e) => Err(IndexingError::RepositoryError(e.to_string())),
        }
    }
}
