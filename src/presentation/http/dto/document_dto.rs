use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::use_cases::delete_document::DeleteDocumentResponse;
use crate::application::use_cases::list_documents::ListDocumentsResponse;
use crate::application::use_cases::upload_document::UploadDocumentResponse;
use crate::domain::entities::Document;

#[derive(Debug, Serialize)]
pub struct DocumentMetadataDto {
    pub title: Option<String>,
    pub authors: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub page_count: Option<i32>,
    pub reference_count: Option<i32>,
    pub appears_academic: bool,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponseDto {
    pub id: i32,
    pub file_name: String,
    pub title: String,
    pub metadata: DocumentMetadataDto,
    pub file_size: i64,
    pub status: String,
    pub error_message: Option<String>,
    pub chunk_count: Option<i32>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponseDto {
    fn from(document: Document) -> Self {
        let metadata = document.metadata();
        let metadata_dto = DocumentMetadataDto {
            title: metadata.title.clone(),
            authors: metadata.authors.clone(),
            abstract_text: metadata.abstract_text.clone(),
            publication_date: metadata.publication_date.clone(),
            page_count: metadata.page_count,
            reference_count: metadata.reference_count,
            appears_academic: metadata.appears_academic,
        };

        Self {
            id: document.id(),
            file_name: document.file_name().to_string(),
            title: document.title().to_string(),
            metadata: metadata_dto,
            file_size: document.file_size(),
            status: document.status().as_str().to_string(),
            error_message: document.status().error_message().map(|s| s.to_string()),
            chunk_count: document.chunk_count(),
            uploaded_at: document.uploaded_at(),
            updated_at: document.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub document_id: i32,
    pub document_title: String,
    pub status: String,
    pub metadata: DocumentMetadataDto,
}

impl From<UploadDocumentResponse> for UploadResponseDto {
    fn from(response: UploadDocumentResponse) -> Self {
        let dto = DocumentResponseDto::from(response.document);
        Self {
            document_id: dto.id,
            document_title: dto.title,
            status: dto.status,
            metadata: dto.metadata,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentResponseDto>,
    pub total_count: i64,
    pub offset: i64,
    pub limit: i64,
}

impl From<ListDocumentsResponse> for DocumentListResponseDto {
    fn from(response: ListDocumentsResponse) -> Self {
        Self {
            documents: response
                .documents
                .into_iter()
                .map(DocumentResponseDto::from)
                .collect(),
            total_count: response.total_count,
            offset: response.offset,
            limit: response.limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponseDto {
    pub document_id: i32,
    pub file_name: String,
    pub message: String,
}

impl From<DeleteDocumentResponse> for DeleteResponseDto {
    fn from(response: DeleteDocumentResponse) -> Self {
        Self {
            document_id: response.document_id,
            file_name: response.file_name,
            message: "Document deleted".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaginationDto {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}
