use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::application::ports::indexing_queue::IndexingTask;
use crate::application::ports::{
    FileStorage, IndexingQueue, MetadataExtractor, TextExtractor,
};
use crate::config::DocumentStoreConfig;
use crate::domain::entities::{Document, NewDocument};
use crate::domain::repositories::DocumentRepository;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug)]
pub enum UploadDocumentError {
    ValidationError(String),
    StorageError(String),
    RepositoryError(String),
    QueueError(String),
}

impl std::fmt::Display for UploadDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadDocumentError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            UploadDocumentError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            UploadDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            UploadDocumentError::QueueError(msg) => write!(f, "Queue error: {}", msg),
        }
    }
}

impl std::error::Error for UploadDocumentError {}

#[derive(Debug, Clone)]
pub struct UploadDocumentRequest {
    pub file_name: String,
    pub file_data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentResponse {
    pub document: Document,
}

/// Upload ingestion: validate the file, probe the page count, pull
/// bibliographic metadata, persist the PDF and its record (`uploaded`), and
/// queue the document for asynchronous indexing. Metadata extraction is
/// best-effort; the record is created even when the extraction service is
/// down, just with empty fields.
pub struct UploadDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    metadata_extractor: Arc<dyn MetadataExtractor>,
    text_extractor: Arc<dyn TextExtractor>,
    indexing_queue: Arc<dyn IndexingQueue>,
    config: DocumentStoreConfig,
}

impl UploadDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        metadata_extractor: Arc<dyn MetadataExtractor>,
        text_extractor: Arc<dyn TextExtractor>,
        indexing_queue: Arc<dyn IndexingQueue>,
        config: DocumentStoreConfig,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            metadata_extractor,
            text_extractor,
            indexing_queue,
            config,
        }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<UploadDocumentResponse, UploadDocumentError> {
        validate_pdf_upload(
            &request.file_name,
            &request.file_data,
            self.config.max_upload_bytes,
        )
        .map_err(UploadDocumentError::ValidationError)?;

        let page_count = match self.text_extractor.page_count(&request.file_data).await {
            Ok(count) => Some(count as i32),
            Err(e) => {
                warn!(file_name = %request.file_name, error = %e, "Page count probe failed");
                None
            }
        };

        let metadata = match self
            .metadata_extractor
            .extract_metadata(&request.file_data, &request.file_name)
            .await
        {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    file_name = %request.file_name,
                    error = %e,
                    "Metadata extraction failed; creating record with empty metadata"
                );
                Default::default()
            }
        }
        .with_page_count(page_count);

        let file_hash = format!("{:x}", Sha256::digest(&request.file_data));

        let stored = self
            .file_storage
            .store_file(&request.file_data, &request.file_name)
            .await
            .map_err(|e| UploadDocumentError::StorageError(e.to_string()))?;

        let document = self
            .document_repository
            .create(NewDocument {
                file_name: request.file_name.clone(),
                file_path: stored.path.clone(),
                file_size: request.file_data.len() as i64,
                file_hash: Some(file_hash),
                metadata,
            })
            .await
            .map_err(|e| UploadDocumentError::RepositoryError(e.to_string()))?;

        self.indexing_queue
            .enqueue(IndexingTask::new(document.id(), stored.id))
            .await
            .map_err(|e| UploadDocumentError::QueueError(e.to_string()))?;

        Ok(UploadDocumentResponse { document })
    }
}

/// Upload acceptance rules: `.pdf` name, `%PDF-` magic, non-empty, within
/// the size ceiling.
pub fn validate_pdf_upload(
    file_name: &str,
    file_data: &[u8],
    max_upload_bytes: usize,
) -> Result<(), String> {
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err("Only PDF files are allowed".to_string());
    }
    if file_data.is_empty() {
        return Err("Uploaded file is empty".to_string());
    }
    if !file_data.starts_with(PDF_MAGIC) {
        return Err("File content is not a valid PDF".to_string());
    }
    if file_data.len() > max_upload_bytes {
        return Err(format!(
            "File exceeds the upload limit of {} bytes",
            max_upload_bytes
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 1024;

    #[test]
    fn test_accepts_valid_pdf() {
        assert!(validate_pdf_upload("paper.pdf", b"%PDF-1.7 rest", LIMIT).is_ok());
        assert!(validate_pdf_upload("PAPER.PDF", b"%PDF-1.4 rest", LIMIT).is_ok());
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let err = validate_pdf_upload("notes.txt", b"%PDF-1.7", LIMIT).unwrap_err();
        assert!(err.contains("Only PDF files"));
    }

    #[test]
    fn test_rejects_wrong_magic() {
        let err = validate_pdf_upload("notes.pdf", b"hello world", LIMIT).unwrap_err();
        assert!(err.contains("not a valid PDF"));
    }

    #[test]
    fn test_rejects_empty_file() {
        assert!(validate_pdf_upload("notes.pdf", b"", LIMIT).is_err());
    }

    #[test]
    fn test_rejects_oversized_file() {
        let mut data = b"%PDF-".to_vec();
        data.resize(LIMIT + 1, b'x');
        let err = validate_pdf_upload("big.pdf", &data, LIMIT).unwrap_err();
        assert!(err.contains("upload limit"));
    }
}
