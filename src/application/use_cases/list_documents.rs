use std::sync::Arc;

use crate::config::DocumentStoreConfig;
use crate::domain::entities::Document;
use crate::domain::repositories::DocumentRepository;

#[derive(Debug)]
pub enum ListDocumentsError {
    ValidationError(String),
    RepositoryError(String),
}

impl std::fmt::Display for ListDocumentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListDocumentsError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ListDocumentsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ListDocumentsError {}

#[derive(Debug, Clone, Copy)]
pub struct ListDocumentsRequest {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone)]
pub struct ListDocumentsResponse {
    pub documents: Vec<Document>,
    pub total_count: i64,
    pub offset: i64,
    pub limit: i64,
}

/// Newest-first document listing with offset pagination. The limit is capped
/// rather than rejected when it exceeds the configured page ceiling.
pub struct ListDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    config: DocumentStoreConfig,
}

impl ListDocumentsUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>, config: DocumentStoreConfig) -> Self {
        Self {
            document_repository,
            config,
        }
    }

    pub async fn execute(
        &self,
        request: ListDocumentsRequest,
    ) -> Result<ListDocumentsResponse, ListDocumentsError> {
        if request.offset < 0 {
            return Err(ListDocumentsError::ValidationError(
                "offset must not be negative".to_string(),
            ));
        }
        if request.limit < 0 {
            return Err(ListDocumentsError::ValidationError(
                "limit must not be negative".to_string(),
            ));
        }

        let limit = request.limit.min(self.config.max_page_size);

        let documents = self
            .document_repository
            .find_all(request.offset, limit)
            .await
            .map_err(|e| ListDocumentsError::RepositoryError(e.to_string()))?;

        let total_count = self
            .document_repository
            .count()
            .await
            .map_err(|e| ListDocumentsError::RepositoryError(e.to_string()))?;

        Ok(ListDocumentsResponse {
            documents,
            total_count,
            offset: request.offset,
            limit,
        })
    }
}
