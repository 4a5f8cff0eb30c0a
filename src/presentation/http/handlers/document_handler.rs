use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use crate::application::use_cases::{
    DeleteDocumentUseCase, GetDocumentUseCase, ListDocumentsUseCase, UploadDocumentUseCase,
    delete_document::{DeleteDocumentError, DeleteDocumentRequest},
    get_document::{GetDocumentError, GetDocumentRequest},
    list_documents::{ListDocumentsError, ListDocumentsRequest},
    upload_document::{UploadDocumentError, UploadDocumentRequest},
};
use crate::config::DocumentStoreConfig;
use crate::presentation::http::dto::document_dto::{
    DeleteResponseDto, DocumentListResponseDto, DocumentResponseDto, PaginationDto,
    UploadResponseDto,
};
use crate::presentation::http::dto::{
    ApiResponse, ErrorResponse, error_response, upstream_detail, upstream_status,
};

pub struct DocumentHandler {
    upload_use_case: Arc<UploadDocumentUseCase>,
    list_use_case: Arc<ListDocumentsUseCase>,
    get_use_case: Arc<GetDocumentUseCase>,
    delete_use_case: Arc<DeleteDocumentUseCase>,
    config: DocumentStoreConfig,
}

impl DocumentHandler {
    pub fn new(
        upload_use_case: Arc<UploadDocumentUseCase>,
        list_use_case: Arc<ListDocumentsUseCase>,
        get_use_case: Arc<GetDocumentUseCase>,
        delete_use_case: Arc<DeleteDocumentUseCase>,
        config: DocumentStoreConfig,
    ) -> Self {
        Self {
            upload_use_case,
            list_use_case,
            get_use_case,
            delete_use_case,
            config,
        }
    }

    pub async fn upload_document(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            error_response(StatusCode::BAD_REQUEST, format!("Invalid multipart body: {}", e))
        })? {
            if field.name() != Some("file") {
                continue;
            }

            let file_name = field
                .file_name()
                .map(|name| name.to_string())
                .ok_or_else(|| {
                    error_response(StatusCode::BAD_REQUEST, "Uploaded file has no name")
                })?;

            let data = field
                .bytes()
                .await
                .map_err(|e| {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        format!("Failed to read uploaded file: {}", e),
                    )
                })?
                .to_vec();

            let request = UploadDocumentRequest {
                file_name,
                file_data: data,
            };

            return match handler.upload_use_case.execute(request).await {
                Ok(response) => Ok((
                    StatusCode::CREATED,
                    Json(ApiResponse::success(UploadResponseDto::from(response))),
                )),
                Err(UploadDocumentError::ValidationError(msg)) => {
                    Err(error_response(StatusCode::BAD_REQUEST, msg))
                }
                Err(e) => Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    e.to_string(),
                )),
            };
        }

        Err(error_response(
            StatusCode::BAD_REQUEST,
            "No file provided in the request",
        ))
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        Query(pagination): Query<PaginationDto>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        let request = ListDocumentsRequest {
            offset: pagination.offset.unwrap_or(0),
            limit: pagination.limit.unwrap_or(handler.config.default_page_size),
        };

        match handler.list_use_case.execute(request).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(DocumentListResponseDto::from(response))),
            )),
            Err(ListDocumentsError::ValidationError(msg)) => {
                Err(error_response(StatusCode::BAD_REQUEST, msg))
            }
            Err(e) => Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            )),
        }
    }

    pub async fn get_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<i32>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        match handler
            .get_use_case
            .execute(GetDocumentRequest { document_id })
            .await
        {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(DocumentResponseDto::from(
                    response.document,
                ))),
            )),
            Err(GetDocumentError::NotFound(_)) => Err(error_response(
                StatusCode::NOT_FOUND,
                format!("Document {} not found", document_id),
            )),
            Err(e) => Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            )),
        }
    }

    pub async fn delete_document(
        State(handler): State<Arc<DocumentHandler>>,
        Path(document_id): Path<i32>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        match handler
            .delete_use_case
            .execute(DeleteDocumentRequest { document_id })
            .await
        {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(DeleteResponseDto::from(response))),
            )),
            Err(DeleteDocumentError::NotFound(_)) => Err(error_response(
                StatusCode::NOT_FOUND,
                format!("Document {} not found", document_id),
            )),
            Err(DeleteDocumentError::VectorIndexError { message, timed_out }) => {
                error!(document_id, service = "vector_store", %message, "Delete failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Vector store", timed_out),
                ))
            }
            Err(e) => Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            )),
        }
    }
}
