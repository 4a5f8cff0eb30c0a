use serde::{Deserialize, Serialize};

use crate::application::services::prompt_builder::ChatTurn;
use crate::application::use_cases::chat_with_documents::{ChatRequest, ChatResponse};
use crate::application::use_cases::generate_questions::GenerateQuestionsResponse;
use crate::application::use_cases::summarize_document::SummarizeDocumentResponse;

#[derive(Debug, Serialize)]
pub struct SummaryResponseDto {
    pub document_id: i32,
    pub document_title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub metadata: SummaryMetadataDto,
}

#[derive(Debug, Serialize)]
pub struct SummaryMetadataDto {
    pub chunks_analyzed: usize,
    pub model_used: String,
}

impl From<SummarizeDocumentResponse> for SummaryResponseDto {
    fn from(response: SummarizeDocumentResponse) -> Self {
        Self {
            document_id: response.document_id,
            document_title: response.document_title,
            summary: response.summary,
            key_points: response.key_points,
            metadata: SummaryMetadataDto {
                chunks_analyzed: response.chunks_analyzed,
                model_used: response.model_used,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponseDto {
    pub document_id: i32,
    pub document_title: String,
    pub questions: Vec<String>,
    pub metadata: QuestionsMetadataDto,
}

#[derive(Debug, Serialize)]
pub struct QuestionsMetadataDto {
    pub model_used: String,
    pub used_fallback: bool,
}

impl From<GenerateQuestionsResponse> for QuestionsResponseDto {
    fn from(response: GenerateQuestionsResponse) -> Self {
        Self {
            document_id: response.document_id,
            document_title: response.document_title,
            questions: response.questions,
            metadata: QuestionsMetadataDto {
                model_used: response.model_used,
                used_fallback: response.used_fallback,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequestDto {
    pub question: String,
    pub document_id: Option<i32>,
    #[serde(alias = "history")]
    pub conversation_history: Option<Vec<ChatTurnDto>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatTurnDto {
    pub role: String,
    pub content: String,
}

impl From<ChatRequestDto> for ChatRequest {
    fn from(dto: ChatRequestDto) -> Self {
        Self {
            question: dto.question,
            document_id: dto.document_id,
            history: dto.conversation_history.map(|turns| {
                turns
                    .into_iter()
                    .map(|turn| ChatTurn {
                        role: turn.role,
                        content: turn.content,
                    })
                    .collect()
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatSourceDto {
    pub document_id: i32,
    pub page_number: i32,
    pub similarity_score: f32,
    pub content_preview: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseDto {
    pub question: String,
    pub answer: String,
    pub sources: Vec<ChatSourceDto>,
    pub metadata: ChatMetadataDto,
}

#[derive(Debug, Serialize)]
pub struct ChatMetadataDto {
    pub model_used: Option<String>,
    pub tokens_used: u32,
    pub chunks_used: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ChatResponse> for ChatResponseDto {
    fn from(response: ChatResponse) -> Self {
        Self {
            question: response.question,
            answer: response.answer,
            sources: response
                .sources
                .into_iter()
                .map(|source| ChatSourceDto {
                    document_id: source.document_id,
                    page_number: source.page_number,
                    similarity_score: source.similarity_score,
                    content_preview: source.content_preview,
                })
                .collect(),
            metadata: ChatMetadataDto {
                model_used: response.model_used,
                tokens_used: response.tokens_used,
                chunks_used: response.chunks_used,
                reason: response
                    .no_relevant_context
                    .then(|| "no_relevant_context".to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
    pub components: HealthComponentsDto,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HealthComponentsDto {
    pub database: String,
    pub pdf_processor: String,
    pub rag_pipeline: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_reads_conversation_history() {
        let request: ChatRequestDto = serde_json::from_value(serde_json::json!({
            "question": "What does the paper claim?",
            "document_id": 1,
            "conversation_history": [
                { "role": "user", "content": "What architecture is used?" }
            ]
        }))
        .unwrap();

        let turns = request.conversation_history.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, "user");
    }

    #[test]
    fn test_chat_request_accepts_history_shorthand() {
        let request: ChatRequestDto = serde_json::from_value(serde_json::json!({
            "question": "What does the paper claim?",
            "history": [
                { "role": "assistant", "content": "A transformer." }
            ]
        }))
        .unwrap();

        assert!(request.conversation_history.is_some());
        assert_eq!(request.document_id, None);
    }
}
