use std::sync::Arc;

use crate::application::ports::CompletionProvider;
use crate::application::services::prompt_builder::ChatTurn;
use crate::application::services::retrieval_service::RetrievalError;
use crate::application::services::{PromptBuilder, RetrievalService};
use crate::config::RagConfig;
use crate::domain::repositories::DocumentRepository;

const NO_CONTEXT_ANSWER: &str =
    "No relevant information found. Please rephrase or check the document.";

#[derive(Debug)]
pub enum ChatError {
    ValidationError(String),
    NotFound(i32),
    NotReady { document_id: i32, status: String },
    EmbeddingError { message: String, timed_out: bool },
    VectorIndexError { message: String, timed_out: bool },
    CompletionError { message: String, timed_out: bool },
    RepositoryError(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ChatError::NotFound(id) => write!(f, "Document {} not found", id),
            ChatError::NotReady { document_id, status } => write!(
                f,
                "Document {} is not ready for chat (status: {})",
                document_id, status
            ),
            ChatError::EmbeddingError { message, .. } => write!(f, "Embedding error: {}", message),
            ChatError::VectorIndexError { message, .. } => {
                write!(f, "Vector index error: {}", message)
            }
            ChatError::CompletionError { message, .. } => {
                write!(f, "Completion error: {}", message)
            }
            ChatError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for ChatError {}

#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub question: String,
    pub document_id: Option<i32>,
    pub history: Option<Vec<ChatTurn>>,
}

/// One context chunk that backed the answer, with enough provenance for the
/// caller to jump to the page.
#[derive(Debug, Clone)]
pub struct ChatSource {
    pub document_id: i32,
    pub page_number: i32,
    pub similarity_score: f32,
    pub content_preview: String,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub question: String,
    pub answer: String,
    pub sources: Vec<ChatSource>,
    pub model_used: Option<String>,
    pub tokens_used: u32,
    pub chunks_used: usize,
    pub no_relevant_context: bool,
}

/// Retrieval-augmented question answering over one document or the whole
/// corpus. History is folded into the retrieval query but never persisted.
/// When retrieval yields nothing the use case answers with a canned message
/// instead of calling the model on an empty context.
pub struct ChatWithDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    retrieval_service: Arc<RetrievalService>,
    completion_provider: Arc<dyn CompletionProvider>,
    prompt_builder: PromptBuilder,
    config: RagConfig,
}

impl ChatWithDocumentsUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        retrieval_service: Arc<RetrievalService>,
        completion_provider: Arc<dyn CompletionProvider>,
        config: RagConfig,
    ) -> Self {
        Self {
            document_repository,
            retrieval_service,
            completion_provider,
            prompt_builder: PromptBuilder::new(),
            config,
        }
    }

    pub async fn execute(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(ChatError::ValidationError(
                "question must not be empty".to_string(),
            ));
        }

        if let Some(document_id) = request.document_id {
            let document = self
                .document_repository
                .find_by_id(document_id)
                .await
                .map_err(|e| ChatError::RepositoryError(e.to_string()))?
                .ok_or(ChatError::NotFound(document_id))?;

            if !document.is_ready() {
                return Err(ChatError::NotReady {
                    document_id,
                    status: document.status().as_str().to_string(),
                });
            }
        }

        let query = self.prompt_builder.preprocess_query(
            question,
            request.history.as_deref(),
            self.config.max_history_turns,
        );

        let chunks = self
            .retrieval_service
            .retrieve(&query, self.config.max_chunks, request.document_id)
            .await
            .map_err(|e| match e {
                RetrievalError::EmbeddingError { message, timed_out } => {
                    ChatError::EmbeddingError { message, timed_out }
                }
                RetrievalError::IndexError { message, timed_out } => {
                    ChatError::VectorIndexError { message, timed_out }
                }
                RetrievalError::RepositoryError(msg) => ChatError::RepositoryError(msg),
            })?;

        if chunks.is_empty() {
            return Ok(ChatResponse {
                question: question.to_string(),
                answer: NO_CONTEXT_ANSWER.to_string(),
                sources: Vec::new(),
                model_used: None,
                tokens_used: 0,
                chunks_used: 0,
                no_relevant_context: true,
            });
        }

        let context = self.prompt_builder.format_context(&chunks);
        let prompt = self.prompt_builder.answer_prompt(&context, &query);
        let completion = self.completion_provider.complete(&prompt).await.map_err(|e| {
            ChatError::CompletionError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            }
        })?;

        let sources = chunks
            .iter()
            .map(|chunk| ChatSource {
                document_id: chunk.document_id(),
                page_number: chunk.page_number(),
                similarity_score: round3(chunk.similarity_score),
                content_preview: chunk.content_preview(),
            })
            .collect();

        Ok(ChatResponse {
            question: question.to_string(),
            answer: completion.content,
            sources,
            model_used: Some(completion.model),
            tokens_used: completion.total_tokens,
            chunks_used: chunks.len(),
            no_relevant_context: false,
        })
    }
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.84999), 0.85);
        assert_eq!(round3(0.123456), 0.123);
    }
}
