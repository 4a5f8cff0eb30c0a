use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::{FileStorage, VectorIndex};
use crate::domain::repositories::DocumentRepository;

#[derive(Debug)]
pub enum DeleteDocumentError {
    NotFound(i32),
    VectorIndexError { message: String, timed_out: bool },
    RepositoryError(String),
}

impl std::fmt::Display for DeleteDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteDocumentError::NotFound(id) => write!(f, "Document {} not found", id),
            DeleteDocumentError::VectorIndexError { message, .. } => {
                write!(f, "Vector index error: {}", message)
            }
            DeleteDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DeleteDocumentError {}

#[derive(Debug, Clone, Copy)]
pub struct DeleteDocumentRequest {
    pub document_id: i32,
}

#[derive(Debug, Clone)]
pub struct DeleteDocumentResponse {
    pub document_id: i32,
    pub file_name: String,
}

/// Full teardown of a document: vector index entries first, then the record,
/// then the stored PDF. Index cleanup failure aborts the delete so retrying
/// later can still find the record; a missing file only logs, since the
/// record and index are already gone and the endpoint must stay idempotent
/// from the caller's view.
pub struct DeleteDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    vector_index: Arc<dyn VectorIndex>,
    file_storage: Arc<dyn FileStorage>,
}

impl DeleteDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        vector_index: Arc<dyn VectorIndex>,
        file_storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            document_repository,
            vector_index,
            file_storage,
        }
    }

    pub async fn execute(
        &self,
        request: DeleteDocumentRequest,
    ) -> Result<DeleteDocumentResponse, DeleteDocumentError> {
        let document = self
            .document_repository
            .find_by_id(request.document_id)
            .await
            .map_err(|e| DeleteDocumentError::RepositoryError(e.to_string()))?
            .ok_or(DeleteDocumentError::NotFound(request.document_id))?;

        self.vector_index
            .delete_document(request.document_id)
            .await
            .map_err(|e| DeleteDocumentError::VectorIndexError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            })?;

        let deleted = self
            .document_repository
            .delete(request.document_id)
            .await
            .map_err(|e| DeleteDocumentError::RepositoryError(e.to_string()))?;
        if !deleted {
            // Raced with another delete after the initial lookup.
            return Err(DeleteDocumentError::NotFound(request.document_id));
        }

        match file_id_from_path(document.file_path()) {
            Some(file_id) => {
                if let Err(e) = self.file_storage.delete_file(file_id).await {
                    warn!(
                        document_id = request.document_id,
                        error = %e,
                        "Stored PDF could not be removed"
                    );
                }
            }
            None => warn!(
                document_id = request.document_id,
                file_path = document.file_path(),
                "Stored file path does not carry a file id"
            ),
        }

        info!(document_id = request.document_id, "Document deleted");

        Ok(DeleteDocumentResponse {
            document_id: request.document_id,
            file_name: document.file_name().to_string(),
        })
    }
}

/// Stored PDFs are named `{uuid}.pdf`; recover the id from the record's path.
fn file_id_from_path(path: &str) -> Option<Uuid> {
    let file_name = path.rsplit(['/', '\\']).next()?;
    let stem = file_name.split('.').next()?;
    Uuid::parse_str(stem).ok()
}
