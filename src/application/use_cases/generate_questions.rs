use std::sync::Arc;

use tracing::warn;

use crate::application::ports::{CompletionProvider, VectorIndex};
use crate::application::services::PromptBuilder;
use crate::config::RagConfig;
use crate::domain::repositories::DocumentRepository;

const CHUNK_FETCH_LIMIT: usize = 500;
const QUESTION_COUNT: usize = 4;

#[derive(Debug)]
pub enum GenerateQuestionsError {
    NotFound(i32),
    NotReady { document_id: i32, status: String },
    VectorIndexError { message: String, timed_out: bool },
    CompletionError { message: String, timed_out: bool },
    RepositoryError(String),
    NoContent(i32),
}

impl std::fmt::Display for GenerateQuestionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateQuestionsError::NotFound(id) => write!(f, "Document {} not found", id),
            GenerateQuestionsError::NotReady { document_id, status } => write!(
                f,
                "Document {} is not ready for question generation (status: {})",
                document_id, status
            ),
            GenerateQuestionsError::VectorIndexError { message, .. } => {
                write!(f, "Vector index error: {}", message)
            }
            GenerateQuestionsError::CompletionError { message, .. } => {
                write!(f, "Completion error: {}", message)
            }
            GenerateQuestionsError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            GenerateQuestionsError::NoContent(id) => {
                write!(f, "No indexed content found for document {}", id)
            }
        }
    }
}

impl std::error::Error for GenerateQuestionsError {}

#[derive(Debug, Clone, Copy)]
pub struct GenerateQuestionsRequest {
    pub document_id: i32,
}

#[derive(Debug, Clone)]
pub struct GenerateQuestionsResponse {
    pub document_id: i32,
    pub document_title: String,
    pub questions: Vec<String>,
    pub model_used: String,
    pub used_fallback: bool,
}

/// Generates up to four analytical questions from a ready document's indexed
/// content. When the model output yields nothing parseable the canned
/// fallback set is returned instead of an error.
pub struct GenerateQuestionsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    vector_index: Arc<dyn VectorIndex>,
    completion_provider: Arc<dyn CompletionProvider>,
    prompt_builder: PromptBuilder,
    config: RagConfig,
}

impl GenerateQuestionsUseCase {
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
        request: GenerateQuestionsRequest,
    ) -> Result<GenerateQuestionsResponse, GenerateQuestionsError> {
        let document = self
            .document_repository
            .find_by_id(request.document_id)
            .await
            .map_err(|e| GenerateQuestionsError::RepositoryError(e.to_string()))?
            .ok_or(GenerateQuestionsError::NotFound(request.document_id))?;

        if !document.is_ready() {
            return Err(GenerateQuestionsError::NotReady {
                document_id: request.document_id,
                status: document.status().as_str().to_string(),
            });
        }

        let mut chunks = self
            .vector_index
            .fetch_document_chunks(request.document_id, CHUNK_FETCH_LIMIT)
            .await
            .map_err(|e| GenerateQuestionsError::VectorIndexError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            })?;
        chunks.sort_by_key(|c| c.chunk_index);

        let (content, _) = self
            .prompt_builder
            .pack_context(&chunks, self.config.max_context_chars);

        if content.is_empty() {
            return Err(GenerateQuestionsError::NoContent(request.document_id));
        }

        let prompt = self.prompt_builder.question_prompt(&document, &content);
        let completion = self.completion_provider.complete(&prompt).await.map_err(|e| {
            GenerateQuestionsError::CompletionError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            }
        })?;

        let mut questions = self.prompt_builder.parse_questions(&completion.content);
        questions.truncate(QUESTION_COUNT);

        let used_fallback = questions.is_empty();
        if used_fallback {
            warn!(
                document_id = request.document_id,
                "Model output contained no parseable questions; using fallback set"
            );
            questions = self.prompt_builder.fallback_questions();
        }

        Ok(GenerateQuestionsResponse {
            document_id: request.document_id,
            document_title: document.title().to_string(),
            questions,
            model_used: completion.model,
            used_fallback,
        })
    }
}
