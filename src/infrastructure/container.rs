use std::{path::PathBuf, sync::Arc};

use crate::{
    application::{
        ports::{
            CompletionProvider, EmbeddingProvider, FileStorage, IndexingQueue, MetadataExtractor,
            TextExtractor, VectorIndex,
        },
        services::{DocumentIndexer, RetrievalService, TextChunker},
        use_cases::{
            ChatWithDocumentsUseCase, CheckHealthUseCase, DeleteDocumentUseCase,
            GenerateQuestionsUseCase, GetDocumentUseCase, ListDocumentsUseCase,
            SummarizeDocumentUseCase, UploadDocumentUseCase,
        },
    },
    config::{DocumentStoreConfig, RagConfig},
    domain::repositories::DocumentRepository,
    infrastructure::{
        database::{
            create_connection_pool, get_connection_from_pool,
            repositories::PostgresDocumentRepository, run_migrations,
        },
        external_services::{
            ChromaVectorIndex, GrobidClient, HttpEmbeddingsClient, OpenRouterClient,
            PdfTextExtractor, openrouter_client::OpenRouterClientConfig,
        },
        file_system::LocalFileStorage,
        messaging::{IndexingWorker, MpscIndexingQueue},
    },
    presentation::http::handlers::{DocumentHandler, HealthHandler, RagHandler},
};

pub struct AppContainer {
    // Repositories
    pub document_repository: Arc<dyn DocumentRepository>,

    // External services
    pub metadata_extractor: Arc<dyn MetadataExtractor>,
    pub text_extractor: Arc<dyn TextExtractor>,
    pub embedding_provider: Arc<dyn EmbeddingProvider>,
    pub vector_index: Arc<dyn VectorIndex>,
    pub completion_provider: Arc<dyn CompletionProvider>,
    pub file_storage: Arc<dyn FileStorage>,

    // Indexing pipeline
    pub indexing_queue: Arc<dyn IndexingQueue>,
    pub indexing_worker: Option<IndexingWorker>,

    // Use cases
    pub upload_document_use_case: Arc<UploadDocumentUseCase>,
    pub list_documents_use_case: Arc<ListDocumentsUseCase>,
    pub get_document_use_case: Arc<GetDocumentUseCase>,
    pub delete_document_use_case: Arc<DeleteDocumentUseCase>,
    pub summarize_document_use_case: Arc<SummarizeDocumentUseCase>,
    pub generate_questions_use_case: Arc<GenerateQuestionsUseCase>,
    pub chat_use_case: Arc<ChatWithDocumentsUseCase>,
    pub check_health_use_case: Arc<CheckHealthUseCase>,

    // HTTP handlers
    pub document_handler: Arc<DocumentHandler>,
    pub rag_handler: Arc<RagHandler>,
    pub health_handler: Arc<HealthHandler>,
}

impl AppContainer {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let rag_config = RagConfig::from_env();
        let store_config = DocumentStoreConfig::from_env();

        let db_pool = create_connection_pool()?;
        let mut conn = get_connection_from_pool(&db_pool)
            .map_err(|e| format!("Failed to get database connection: {}", e))?;
        run_migrations(&mut conn).map_err(|e| format!("Failed to run migrations: {}", e))?;
        drop(conn);

        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool));

        let metadata_extractor: Arc<dyn MetadataExtractor> = Arc::new(GrobidClient::from_env()?);
        let text_extractor: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor::new());
        let embedding_provider: Arc<dyn EmbeddingProvider> =
            Arc::new(HttpEmbeddingsClient::from_env()?);
        let vector_index: Arc<dyn VectorIndex> = Arc::new(ChromaVectorIndex::from_env()?);
        let completion_provider: Arc<dyn CompletionProvider> = Arc::new(OpenRouterClient::new(
            OpenRouterClientConfig::from_env(&rag_config),
        )?);

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()));
        let file_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(upload_dir));

        let (indexing_queue, task_receiver) = MpscIndexingQueue::create_pair();
        let indexing_queue: Arc<dyn IndexingQueue> = Arc::new(indexing_queue);

        let chunker = TextChunker::new(rag_config.chunk_size, rag_config.chunk_overlap);
        let indexer = Arc::new(DocumentIndexer::new(
            document_repository.clone(),
            file_storage.clone(),
            text_extractor.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
            chunker,
        ));
        let indexing_worker = IndexingWorker::new(indexer, task_receiver);

        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider.clone(),
            vector_index.clone(),
            document_repository.clone(),
            rag_config.max_distance,
        ));

        let upload_document_use_case = Arc::new(UploadDocumentUseCase::new(
            document_repository.clone(),
            file_storage.clone(),
            metadata_extractor.clone(),
            text_extractor.clone(),
            indexing_queue.clone(),
            store_config.clone(),
        ));

        let list_documents_use_case = Arc::new(ListDocumentsUseCase::new(
            document_repository.clone(),
            store_config.clone(),
        ));

        let get_document_use_case =
            Arc::new(GetDocumentUseCase::new(document_repository.clone()));

        let delete_document_use_case = Arc::new(DeleteDocumentUseCase::new(
            document_repository.clone(),
            vector_index.clone(),
            file_storage.clone(),
        ));

        let summarize_document_use_case = Arc::new(SummarizeDocumentUseCase::new(
            document_repository.clone(),
            vector_index.clone(),
            completion_provider.clone(),
            rag_config.clone(),
        ));

        let generate_questions_use_case = Arc::new(GenerateQuestionsUseCase::new(
            document_repository.clone(),
            vector_index.clone(),
            completion_provider.clone(),
            rag_config.clone(),
        ));

        let chat_use_case = Arc::new(ChatWithDocumentsUseCase::new(
            document_repository.clone(),
            retrieval_service.clone(),
            completion_provider.clone(),
            rag_config.clone(),
        ));

        let check_health_use_case = Arc::new(CheckHealthUseCase::new(
            document_repository.clone(),
            metadata_extractor.clone(),
            file_storage.clone(),
            embedding_provider.clone(),
            vector_index.clone(),
            completion_provider.clone(),
        ));

        let document_handler = Arc::new(DocumentHandler::new(
            upload_document_use_case.clone(),
            list_documents_use_case.clone(),
            get_document_use_case.clone(),
            delete_document_use_case.clone(),
            store_config.clone(),
        ));

        let rag_handler = Arc::new(RagHandler::new(
            summarize_document_use_case.clone(),
            generate_questions_use_case.clone(),
            chat_use_case.clone(),
        ));

        let health_handler = Arc::new(HealthHandler::new(check_health_use_case.clone()));

        Ok(Self {
            document_repository,
            metadata_extractor,
            text_extractor,
            embedding_provider,
            vector_index,
            completion_provider,
            file_storage,
            indexing_queue,
            indexing_worker: Some(indexing_worker),
            upload_document_use_case,
            list_documents_use_case,
            get_document_use_case,
            delete_document_use_case,
            summarize_document_use_case,
            generate_questions_use_case,
            chat_use_case,
            check_health_use_case,
            document_handler,
            rag_handler,
            health_handler,
        })
    }

    /// Start the background indexing worker. Idempotent after the first call.
    pub fn start_indexing_worker(&mut self) {
        if let Some(worker) = self.indexing_worker.take() {
            worker.spawn();
        }
    }
}
