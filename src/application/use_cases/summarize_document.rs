use std::sync::Arc;

use crate::application::ports::{CompletionProvider, VectorIndex};
use crate::application::services::PromptBuilder;
use crate::config::RagConfig;
use crate::domain::repositories::DocumentRepository;

const CHUNK_FETCH_LIMIT: usize = 500;

#[derive(Debug)]
pub enum SummarizeDocumentError {
    NotFound(i32),
    NotReady { document_id: i32, status: String },
    VectorIndexError { message: String, timed_out: bool },
    CompletionError { message: String, timed_out: bool },
    RepositoryError(String),
    NoContent(i32),
}

impl std::fmt::Display for SummarizeDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizeDocumentError::NotFound(id) => write!(f, "Document {} not found", id),
            SummarizeDocumentError::NotReady { document_id, status } => write!(
                f,
                "Document {} is not ready for summarization (status: {})",
                document_id, status
            ),
            SummarizeDocumentError::VectorIndexError { message, .. } => {
                write!(f, "Vector index error: {}", message)
            }
            SummarizeDocumentError::CompletionError { message, .. } => {
                write!(f, "Completion error: {}", message)
            }
            SummarizeDocumentError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            SummarizeDocumentError::NoContent(id) => {
                write!(f, "No indexed content found for document {}", id)
            }
        }
    }
}

impl std::error::Error for SummarizeDocumentError {}

#[derive(Debug, Clone, Copy)]
pub struct SummarizeDocumentRequest {
    pub document_id: i32,
}

#[derive(Debug, Clone)]
pub struct SummarizeDocumentResponse {
    pub document_id: i32,
    pub document_title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub model_used: String,
    pub chunks_analyzed: usize,
}

/// Builds a document summary from its own indexed chunks, taken in reading
/// order and packed up to the context budget, so the output is stable across
/// calls. Requires `ready` status.
pub struct SummarizeDocumentUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    vector_index: Arc<dyn VectorIndex>,
    completion_provider: Arc<dyn CompletionProvider>,
    prompt_builder: PromptBuilder,
    config: RagConfig,
}

impl SummarizeDocumentUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        vector_index: Arc<dyn VectorIndex>,
        completion_provider: Arc<dyn CompletionProvider>,
        config: RagConfig,
    ) -> Self {
        Self {
            document_repository,
            vector_index,
            completion_provider,
            prompt_builder: PromptBuilder::new(),
            config,
        }
    }

    pub async fn execute(
        &self,
        request: SummarizeDocumentRequest,
    ) -> Result<SummarizeDocumentResponse, SummarizeDocumentError> {
        let document = self
            .document_repository
            .find_by_id(request.document_id)
            .await
            .map_err(|e| SummarizeDocumentError::RepositoryError(e.to_string()))?
            .ok_or(SummarizeDocumentError::NotFound(request.document_id))?;

        if !document.is_ready() {
            return Err(SummarizeDocumentError::NotReady {
                document_id: request.document_id,
                status: document.status().as_str().to_string(),
            });
        }

        let mut chunks = self
            .vector_index
            .fetch_document_chunks(request.document_id, CHUNK_FETCH_LIMIT)
            .await
            .map_err(|e| SummarizeDocumentError::VectorIndexError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            })?;
        chunks.sort_by_key(|c| c.chunk_index);

        let (content, chunks_analyzed) = self
            .prompt_builder
            .pack_context(&chunks, self.config.max_context_chars);

        if content.is_empty() {
            return Err(SummarizeDocumentError::NoContent(request.document_id));
        }

        let prompt = self.prompt_builder.summary_prompt(&document, &content);
        let completion = self.completion_provider.complete(&prompt).await.map_err(|e| {
            SummarizeDocumentError::CompletionError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            }
        })?;

        let key_points = self.prompt_builder.extract_bullet_points(&completion.content);

        Ok(SummarizeDocumentResponse {
            document_id: request.document_id,
            document_title: document.title().to_string(),
            summary: completion.content,
            key_points,
            model_used: completion.model,
            chunks_analyzed,
        })
    }
}
