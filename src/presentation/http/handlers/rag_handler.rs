use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::error;

use crate::application::use_cases::{
    ChatWithDocumentsUseCase, GenerateQuestionsUseCase, SummarizeDocumentUseCase,
    chat_with_documents::ChatError,
    generate_questions::{GenerateQuestionsError, GenerateQuestionsRequest},
    summarize_document::{SummarizeDocumentError, SummarizeDocumentRequest},
};
use crate::presentation::http::dto::rag_dto::{
    ChatRequestDto, ChatResponseDto, QuestionsResponseDto, SummaryResponseDto,
};
use crate::presentation::http::dto::{
    ApiResponse, ErrorResponse, error_response, upstream_detail, upstream_status,
};

pub struct RagHandler {
    summarize_use_case: Arc<SummarizeDocumentUseCase>,
    questions_use_case: Arc<GenerateQuestionsUseCase>,
    chat_use_case: Arc<ChatWithDocumentsUseCase>,
}

impl RagHandler {
    pub fn new(
        summarize_use_case: Arc<SummarizeDocumentUseCase>,
        questions_use_case: Arc<GenerateQuestionsUseCase>,
        chat_use_case: Arc<ChatWithDocumentsUseCase>,
    ) -> Self {
        Self {
            summarize_use_case,
            questions_use_case,
            chat_use_case,
        }
    }

    pub async fn summarize_document(
        State(handler): State<Arc<RagHandler>>,
        Path(document_id): Path<i32>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        match handler
            .summarize_use_case
            .execute(SummarizeDocumentRequest { document_id })
            .await
        {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(SummaryResponseDto::from(response))),
            )),
            Err(SummarizeDocumentError::NotFound(_)) => Err(error_response(
                StatusCode::NOT_FOUND,
                format!("Document {} not found", document_id),
            )),
            Err(e @ SummarizeDocumentError::NotReady { .. }) => {
                Err(error_response(StatusCode::CONFLICT, e.to_string()))
            }
            Err(SummarizeDocumentError::VectorIndexError { message, timed_out }) => {
                error!(document_id, service = "vector_store", %message, "Summarization failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Vector store", timed_out),
                ))
            }
            Err(SummarizeDocumentError::CompletionError { message, timed_out }) => {
                error!(document_id, service = "language_model", %message, "Summarization failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Language model", timed_out),
                ))
            }
            Err(e) => Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            )),
        }
    }

    pub async fn generate_questions(
        State(handler): State<Arc<RagHandler>>,
        Path(document_id): Path<i32>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        match handler
            .questions_use_case
            .execute(GenerateQuestionsRequest { document_id })
            .await
        {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(QuestionsResponseDto::from(response))),
            )),
            Err(GenerateQuestionsError::NotFound(_)) => Err(error_response(
                StatusCode::NOT_FOUND,
                format!("Document {} not found", document_id),
            )),
            Err(e @ GenerateQuestionsError::NotReady { .. }) => {
                Err(error_response(StatusCode::CONFLICT, e.to_string()))
            }
            Err(GenerateQuestionsError::VectorIndexError { message, timed_out }) => {
                error!(document_id, service = "vector_store", %message, "Question generation failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Vector store", timed_out),
                ))
            }
            Err(GenerateQuestionsError::CompletionError { message, timed_out }) => {
                error!(document_id, service = "language_model", %message, "Question generation failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Language model", timed_out),
                ))
            }
            Err(e) => Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            )),
        }
    }

    pub async fn chat(
        State(handler): State<Arc<RagHandler>>,
        Json(request): Json<ChatRequestDto>,
    ) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
        match handler.chat_use_case.execute(request.into()).await {
            Ok(response) => Ok((
                StatusCode::OK,
                Json(ApiResponse::success(ChatResponseDto::from(response))),
            )),
            Err(ChatError::ValidationError(msg)) => {
                Err(error_response(StatusCode::BAD_REQUEST, msg))
            }
            Err(ChatError::NotFound(id)) => Err(error_response(
                StatusCode::NOT_FOUND,
                format!("Document {} not found", id),
            )),
            Err(e @ ChatError::NotReady { .. }) => {
                Err(error_response(StatusCode::CONFLICT, e.to_string()))
            }
            Err(ChatError::EmbeddingError { message, timed_out }) => {
                error!(service = "embeddings", %message, "Chat failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Embedding service", timed_out),
                ))
            }
            Err(ChatError::VectorIndexError { message, timed_out }) => {
                error!(service = "vector_store", %message, "Chat failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Vector store", timed_out),
                ))
            }
            Err(ChatError::CompletionError { message, timed_out }) => {
                error!(service = "language_model", %message, "Chat failed upstream");
                Err(error_response(
                    upstream_status(timed_out),
                    upstream_detail("Language model", timed_out),
                ))
            }
            Err(e) => Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
            )),
        }
    }
}
