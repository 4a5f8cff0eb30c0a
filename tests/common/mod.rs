use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use docmind::application::ports::completion_provider::{
    Completion, CompletionError, CompletionProvider,
};
use docmind::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};
use docmind::application::ports::file_storage::{FileStorage, FileStorageError, StoredFile};
use docmind::application::ports::metadata_extractor::{MetadataExtractionError, MetadataExtractor};
use docmind::application::ports::text_extractor::{PageText, TextExtractionError, TextExtractor};
use docmind::application::ports::vector_index::{
    EmbeddedChunk, ScoredChunk, StoredChunk, VectorIndex, VectorIndexError,
};
use docmind::application::ports::IndexingQueue;
use docmind::application::services::{DocumentIndexer, RetrievalService, TextChunker};
use docmind::application::use_cases::{
    ChatWithDocumentsUseCase, CheckHealthUseCase, DeleteDocumentUseCase, GenerateQuestionsUseCase,
    GetDocumentUseCase, ListDocumentsUseCase, SummarizeDocumentUseCase, UploadDocumentUseCase,
};
use docmind::config::{DocumentStoreConfig, RagConfig};
use docmind::domain::entities::{Document, NewDocument};
use docmind::domain::repositories::document_repository::DocumentRepositoryError;
use docmind::domain::repositories::DocumentRepository;
use docmind::domain::value_objects::{DocumentMetadata, DocumentStatus};
use docmind::infrastructure::messaging::{IndexingTaskReceiver, MpscIndexingQueue};
use docmind::presentation::http::app_router;
use docmind::presentation::http::handlers::{DocumentHandler, HealthHandler, RagHandler};

/// A minimal but well-formed PDF: header magic plus enough structure that a
/// test reads naturally.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<<>>\n%%EOF".to_vec()
}

pub struct InMemoryDocumentRepository {
    documents: Mutex<Vec<Document>>,
    next_id: AtomicI32,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, new_document: NewDocument) -> Result<Document, DocumentRepositoryError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let document = Document::from_parts(
            id,
            new_document.file_name,
            new_document.file_path,
            new_document.file_size,
            new_document.file_hash,
            new_document.metadata,
            DocumentStatus::Uploaded,
            None,
            now,
            now,
        );
        self.documents.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id() == id)
            .cloned())
    }

    async fn find_all(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap().clone();
        documents.sort_by(|a, b| {
            b.uploaded_at()
                .cmp(&a.uploaded_at())
                .then(b.id().cmp(&a.id()))
        });
        Ok(documents
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, DocumentRepositoryError> {
        Ok(self.documents.lock().unwrap().len() as i64)
    }

    async fn update_status(
        &self,
        id: i32,
        status: DocumentStatus,
    ) -> Result<(), DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or(DocumentRepositoryError::NotFound(id))?;

        let updated = Document::from_parts(
            document.id(),
            document.file_name().to_string(),
            document.file_path().to_string(),
            document.file_size(),
            document.file_hash().map(|h| h.to_string()),
            document.metadata().clone(),
            status,
            document.chunk_count(),
            document.uploaded_at(),
            Utc::now(),
        );
        *document = updated;
        Ok(())
    }

    async fn update_chunk_count(
        &self,
        id: i32,
        chunk_count: i32,
    ) -> Result<(), DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let document = documents
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or(DocumentRepositoryError::NotFound(id))?;

        let updated = Document::from_parts(
            document.id(),
            document.file_name().to_string(),
            document.file_path().to_string(),
            document.file_size(),
            document.file_hash().map(|h| h.to_string()),
            document.metadata().clone(),
            document.status().clone(),
            Some(chunk_count),
            document.uploaded_at(),
            Utc::now(),
        );
        *document = updated;
        Ok(())
    }

    async fn delete(&self, id: i32) -> Result<bool, DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id() != id);
        Ok(documents.len() < before)
    }
}

pub struct StubMetadataExtractor {
    pub metadata: DocumentMetadata,
    pub fail: AtomicBool,
}

impl StubMetadataExtractor {
    pub fn new() -> Self {
        let metadata = DocumentMetadata::new()
            .with_title(Some("A Study of Retrieval".to_string()))
            .with_authors(Some("J. Doe, R. Roe".to_string()))
            .with_abstract(Some("We study retrieval over research papers.".to_string()));
        Self {
            metadata,
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MetadataExtractor for StubMetadataExtractor {
    async fn extract_metadata(
        &self,
        _pdf_bytes: &[u8],
        _file_name: &str,
    ) -> Result<DocumentMetadata, MetadataExtractionError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MetadataExtractionError::ServiceUnavailable(
                "stubbed outage".to_string(),
            ));
        }
        Ok(self.metadata.clone())
    }

    async fn health_check(&self) -> bool {
        !self.fail.load(Ordering::SeqCst)
    }
}

pub struct StubTextExtractor {
    pub pages: Vec<PageText>,
}

impl StubTextExtractor {
    pub fn new() -> Self {
        Self {
            pages: vec![
                PageText {
                    page_number: 1,
                    text: "Transformers rely entirely on attention mechanisms for sequence \
                           transduction and dispense with recurrence."
                        .to_string(),
                },
                PageText {
                    page_number: 2,
                    text: "Experiments on machine translation show the model to be superior \
                           in quality while requiring less training time."
                        .to_string(),
                },
            ],
        }
    }
}

#[async_trait]
impl TextExtractor for StubTextExtractor {
    async fn page_count(&self, _pdf_bytes: &[u8]) -> Result<usize, TextExtractionError> {
        Ok(self.pages.len())
    }

    async fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageText>, TextExtractionError> {
        Ok(self.pages.clone())
    }
}

pub struct StubEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError> {
        Ok(texts
            .iter()
            .map(|t| vec![t.len() as f32, 1.0, 0.0, 0.0])
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }
}

/// Vector index fake: stores chunks per document and answers searches with a
/// deterministic distance derived from the chunk sequence.
pub struct InMemoryVectorIndex {
    chunks: Mutex<Vec<(i32, EmbeddedChunk)>>,
    pub fail_delete: AtomicBool,
    pub fail_search: AtomicBool,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            fail_delete: AtomicBool::new(false),
            fail_search: AtomicBool::new(false),
        }
    }

    pub fn chunk_count(&self, document_id: i32) -> usize {
        self.chunks
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == document_id)
            .count()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn index_chunks(
        &self,
        document_id: i32,
        chunks: &[EmbeddedChunk],
    ) -> Result<(), VectorIndexError> {
        let mut stored = self.chunks.lock().unwrap();
        stored.retain(|(id, _)| *id != document_id);
        for chunk in chunks {
            stored.push((document_id, chunk.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        _query_embedding: &[f32],
        k: usize,
        document_id: Option<i32>,
    ) -> Result<Vec<ScoredChunk>, VectorIndexError> {
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(VectorIndexError::ConnectionError(
                "stubbed outage".to_string(),
            ));
        }
        let stored = self.chunks.lock().unwrap();
        let mut results: Vec<ScoredChunk> = stored
            .iter()
            .filter(|(id, _)| document_id.is_none_or(|scope| *id == scope))
            .map(|(id, chunk)| ScoredChunk {
                document_id: *id,
                chunk_index: chunk.chunk_index,
                page_number: chunk.page_number,
                content: chunk.content.clone(),
                distance: 0.2 + 0.1 * chunk.chunk_index as f32,
            })
            .collect();
        results.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
        results.truncate(k);
        Ok(results)
    }

    async fn fetch_document_chunks(
        &self,
        document_id: i32,
        limit: usize,
    ) -> Result<Vec<StoredChunk>, VectorIndexError> {
        let stored = self.chunks.lock().unwrap();
        Ok(stored
            .iter()
            .filter(|(id, _)| *id == document_id)
            .take(limit)
            .map(|(id, chunk)| StoredChunk {
                document_id: *id,
                chunk_index: chunk.chunk_index,
                page_number: chunk.page_number,
                content: chunk.content.clone(),
            })
            .collect())
    }

    async fn delete_document(&self, document_id: i32) -> Result<(), VectorIndexError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(VectorIndexError::ConnectionError(
                "stubbed outage".to_string(),
            ));
        }
        self.chunks
            .lock()
            .unwrap()
            .retain(|(id, _)| *id != document_id);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

pub struct StubCompletionProvider {
    pub response: Mutex<String>,
}

impl StubCompletionProvider {
    pub fn new(response: &str) -> Self {
        Self {
            response: Mutex::new(response.to_string()),
        }
    }

    pub fn set_response(&self, response: &str) {
        *self.response.lock().unwrap() = response.to_string();
    }
}

#[async_trait]
impl CompletionProvider for StubCompletionProvider {
    async fn complete(&self, _prompt: &str) -> Result<Completion, CompletionError> {
        Ok(Completion {
            content: self.response.lock().unwrap().clone(),
            model: "stub-model".to_string(),
            total_tokens: 42,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

pub struct InMemoryFileStorage {
    files: Mutex<HashMap<Uuid, Vec<u8>>>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn store_file(
        &self,
        data: &[u8],
        _file_name: &str,
    ) -> Result<StoredFile, FileStorageError> {
        let id = Uuid::new_v4();
        self.files.lock().unwrap().insert(id, data.to_vec());
        Ok(StoredFile {
            id,
            path: format!("/tmp/uploads/{}.pdf", id),
            size: data.len() as u64,
        })
    }

    async fn retrieve_file(&self, file_id: Uuid) -> Result<Vec<u8>, FileStorageError> {
        self.files
            .lock()
            .unwrap()
            .get(&file_id)
            .cloned()
            .ok_or_else(|| FileStorageError::FileNotFound(file_id.to_string()))
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError> {
        Ok(self.files.lock().unwrap().remove(&file_id).is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Full application wired from fakes, plus handles for driving the indexing
/// pipeline and inspecting side effects.
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryDocumentRepository>,
    pub vector_index: Arc<InMemoryVectorIndex>,
    pub metadata_extractor: Arc<StubMetadataExtractor>,
    pub completion_provider: Arc<StubCompletionProvider>,
    pub indexer: Arc<DocumentIndexer>,
    pub task_receiver: IndexingTaskReceiver,
}

impl TestApp {
    pub fn new() -> Self {
        let rag_config = RagConfig::default();
        let store_config = DocumentStoreConfig::default();

        let repository = Arc::new(InMemoryDocumentRepository::new());
        let metadata_extractor = Arc::new(StubMetadataExtractor::new());
        let text_extractor = Arc::new(StubTextExtractor::new());
        let embedding_provider = Arc::new(StubEmbeddingProvider);
        let vector_index = Arc::new(InMemoryVectorIndex::new());
        let completion_provider = Arc::new(StubCompletionProvider::new(
            "- The model relies on attention\n- Results beat the baselines",
        ));
        let file_storage = Arc::new(InMemoryFileStorage::new());

        let (queue, task_receiver) = MpscIndexingQueue::create_pair();
        let queue: Arc<dyn IndexingQueue> = Arc::new(queue);

        let indexer = Arc::new(DocumentIndexer::new(
            repository.clone(),
            file_storage.clone(),
            text_extractor.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
            TextChunker::new(rag_config.chunk_size, rag_config.chunk_overlap),
        ));

        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            vector_index.clone(),
            repository.clone(),
            rag_config.max_distance,
        ));

        let document_handler = Arc::new(DocumentHandler::new(
            Arc::new(UploadDocumentUseCase::new(
                repository.clone(),
                file_storage.clone(),
                metadata_extractor.clone(),
                text_extractor.clone(),
                queue.clone(),
                store_config.clone(),
            )),
            Arc::new(ListDocumentsUseCase::new(
                repository.clone(),
                store_config.clone(),
            )),
            Arc::new(GetDocumentUseCase::new(repository.clone())),
            Arc::new(DeleteDocumentUseCase::new(
                repository.clone(),
                vector_index.clone(),
                file_storage.clone(),
            )),
            store_config.clone(),
        ));

        let rag_handler = Arc::new(RagHandler::new(
            Arc::new(SummarizeDocumentUseCase::new(
                repository.clone(),
                vector_index.clone(),
                completion_provider.clone(),
                rag_config.clone(),
            )),
            Arc::new(GenerateQuestionsUseCase::new(
                repository.clone(),
                vector_index.clone(),
                completion_provider.clone(),
                rag_config.clone(),
            )),
            Arc::new(ChatWithDocumentsUseCase::new(
                repository.clone(),
                retrieval_service,
                completion_provider.clone(),
                rag_config.clone(),
            )),
        ));

        let health_handler = Arc::new(HealthHandler::new(Arc::new(CheckHealthUseCase::new(
            repository.clone(),
            metadata_extractor.clone(),
            file_storage.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
            completion_provider.clone(),
        ))));

        let router = app_router(document_handler, rag_handler, health_handler);

        Self {
            router,
            repository,
            vector_index,
            metadata_extractor,
            completion_provider,
            indexer,
            task_receiver,
        }
    }

    /// Run the next queued indexing task to completion, as the background
    /// worker would.
    pub async fn drive_indexing(&self) {
        let task = self
            .task_receiver
            .recv()
            .await
            .expect("expected a queued indexing task");
        self.indexer
            .index_document(task.document_id, task.file_id)
            .await
            .expect("indexing should succeed");
    }
}
