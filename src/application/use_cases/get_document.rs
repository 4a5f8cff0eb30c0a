use std::sync::Arc;

use crate::domain::entities::Document;
use crate::domain::repositories::DocumentRepository;

#[derive(Debug)]
pub enum GetDocumentError {
    NotFound(i32),
    RepositoryError(String),
}

impl std::fmt::Display for GetDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetDocumentError::NotFound(id) => write!(f, "Document {} not found", id),
            GetDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for GetDocumentError {}

#[derive(Debug, Clone, Copy)]
pub struct GetDocumentRequest {
    pub document_id: i32,
}

#[derive(Debug, Clone)]
pub struct GetDocumentResponse {
    pub document: Document,
}

pub struct GetDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
}

impl GetDocumentUseCase {
    pub fn new(document_repository: Arc<dyn DocumentRepository>) -> Self {
        Self { document_repository }
    }

    pub async fn execute(
        &self,
        request: GetDocumentRequest,
    ) -> Result<GetDocumentResponse, GetDocumentError> {
        let document = self
            .document_repository
            .find_by_id(request.document_id)
            .await
            .map_err(|e| GetDocumentError::RepositoryError(e.to_string()))?
            .ok_or(GetDocumentError::NotFound(request.document_id))?;

        Ok(GetDocumentResponse { document })
    }
}
