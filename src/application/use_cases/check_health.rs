use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::ports::{
    CompletionProvider, EmbeddingProvider, FileStorage, MetadataExtractor, VectorIndex,
};
use crate::domain::repositories::DocumentRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Healthy,
    Unhealthy,
}

impl ComponentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentState::Healthy => "healthy",
            ComponentState::Unhealthy => "unhealthy",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub healthy: bool,
    pub database: ComponentState,
    pub pdf_processor: ComponentState,
    pub rag_pipeline: ComponentState,
    pub checked_at: DateTime<Utc>,
}

/// Probes the dependencies the service cannot work without. The report is
/// `degraded` rather than an error status when a component is down; the
/// endpoint itself always answers 200.
pub struct CheckHealthUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    metadata_extractor: Arc<dyn MetadataExtractor>,
    file_storage: Arc<dyn FileStorage>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    completion_provider: Arc<dyn CompletionProvider>,
}

impl CheckHealthUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        metadata_extractor: Arc<dyn MetadataExtractor>,
        file_storage: Arc<dyn FileStorage>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        completion_provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        Self {
            document_repository,
            metadata_extractor,
            file_storage,
            embedding_provider,
            vector_index,
            completion_provider,
        }
    }

    pub async fn execute(&self) -> HealthReport {
        let (database, extractor, storage, embeddings, index, completions) = tokio::join!(
            self.check_database(),
            self.metadata_extractor.health_check(),
            self.file_storage.health_check(),
            self.embedding_provider.health_check(),
            self.vector_index.health_check(),
            self.completion_provider.health_check(),
        );

        let database = state(database);
        let pdf_processor = state(extractor && storage);
        let rag_pipeline = state(embeddings && index && completions);

        HealthReport {
            healthy: database == ComponentState::Healthy
                && pdf_processor == ComponentState::Healthy
                && rag_pipeline == ComponentState::Healthy,
            database,
            pdf_processor,
            rag_pipeline,
            checked_at: Utc::now(),
        }
    }

    async fn check_database(&self) -> bool {
        self.document_repository.count().await.is_ok()
    }
}

fn state(up: bool) -> ComponentState {
    if up {
        ComponentState::Healthy
    } else {
        ComponentState::Unhealthy
    }
}
