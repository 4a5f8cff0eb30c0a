use serde::{Deserialize, Serialize};

use crate::application::ports::vector_index::StoredChunk;
use crate::application::services::retrieval_service::RetrievedChunk;
use crate::domain::entities::Document;

/// One prior turn of a conversation, supplied by the caller on every chat
/// request. The server never persists transcripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

const SYSTEM_TEMPLATE: &str = "You are an AI assistant for academic documents.\n\n\
Guidelines:\n\
- Use only the provided context to answer questions\n\
- For research papers, focus on methodology, findings, and conclusions\n\
- Cite specific parts of the context when possible\n\
- Be precise, factual, and professional\n\
- If context is insufficient, state limitations\n\
- For summaries, provide concise bullet points (background, methods, results, conclusions)\n\
- For question generation, create 4 analytical questions\n\n\
Context:\n{context}\n\nTask: {task}";

const QUESTION_TEMPLATE: &str = "Generate 4 analytical questions based on the document content.\n\n\
Guidelines:\n\
- Focus on methodology, findings, implications, and applications\n\
- Ensure questions are specific to the content\n\
- Return one question per line, without numbering\n\n\
Content:\n{content}";

/// Assembles completion prompts and parses model output back into
/// structured pieces (key points, suggested questions).
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn answer_prompt(&self, context: &str, question: &str) -> String {
        SYSTEM_TEMPLATE
            .replace("{context}", context)
            .replace("{task}", &format!("Answer: {}", question))
    }

    pub fn summary_prompt(&self, document: &Document, content: &str) -> String {
        let context = format!("{}\n\n{}", self.metadata_context(document), content);
        SYSTEM_TEMPLATE
            .replace("{context}", &context)
            .replace("{task}", "Summarize the document in concise bullet points.")
    }

    pub fn question_prompt(&self, document: &Document, content: &str) -> String {
        let content = format!(
            "Document Title: {}\nAuthors: {}\n\n{}",
            document.title(),
            document.metadata().authors.as_deref().unwrap_or("Unknown"),
            content
        );
        QUESTION_TEMPLATE.replace("{content}", &content)
    }

    fn metadata_context(&self, document: &Document) -> String {
        format!(
            "Document: {}\nAuthors: {}",
            document.title(),
            document.metadata().authors.as_deref().unwrap_or("Unknown")
        )
    }

    /// Concatenate chunks in order until the character budget is spent.
    /// The first chunk always fits so a single oversized chunk still
    /// produces context. Returns the packed text and how many chunks made
    /// it in. The budget counts characters, not bytes.
    pub fn pack_context(&self, chunks: &[StoredChunk], max_chars: usize) -> (String, usize) {
        let mut content = String::new();
        let mut used_chars = 0;
        let mut packed = 0;

        for chunk in chunks {
            let chunk_chars = chunk.content.chars().count();
            if !content.is_empty() && used_chars + 2 + chunk_chars > max_chars {
                break;
            }
            if !content.is_empty() {
                content.push_str("\n\n");
                used_chars += 2;
            }
            content.push_str(&chunk.content);
            used_chars += chunk_chars;
            packed += 1;
        }

        (content, packed)
    }

    /// Tag retrieved chunks with their provenance so the model can cite them.
    pub fn format_context(&self, chunks: &[RetrievedChunk]) -> String {
        if chunks.is_empty() {
            return "No relevant context found.".to_string();
        }
        chunks
            .iter()
            .map(|chunk| {
                format!(
                    "[Document {}, Page {}, Relevance: {:.2}]\n{}",
                    chunk.document_id(),
                    chunk.page_number(),
                    chunk.similarity_score,
                    chunk.content()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fold bounded conversation history into the retrieval query. Oldest
    /// turns are dropped first; prior answers are truncated to keep the
    /// query embeddable.
    pub fn preprocess_query(
        &self,
        question: &str,
        history: Option<&[ChatTurn]>,
        max_turns: usize,
    ) -> String {
        let turns = match history {
            Some(turns) if !turns.is_empty() && max_turns > 0 => turns,
            _ => return question.trim().to_string(),
        };

        let start = turns.len().saturating_sub(max_turns);
        let mut context_parts = Vec::new();
        for turn in &turns[start..] {
            match turn.role.as_str() {
                "user" => context_parts.push(format!("Previous question: {}", turn.content)),
                "assistant" => {
                    let truncated: String = turn.content.chars().take(100).collect();
                    context_parts.push(format!("Previous answer: {}...", truncated));
                }
                _ => {}
            }
        }

        if context_parts.is_empty() {
            question.trim().to_string()
        } else {
            format!(
                "{}\n\nCurrent question: {}",
                context_parts.join(" "),
                question.trim()
            )
        }
    }

    /// Bullet lines from a generated summary, stripped of markers; at most 10.
    pub fn extract_bullet_points(&self, text: &str) -> Vec<String> {
        text.lines()
            .filter_map(|line| {
                let line = line.trim();
                let is_bullet = line.starts_with(['•', '-', '*'])
                    || line
                        .split_once('.')
                        .map(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()))
                        .unwrap_or(false);
                if !is_bullet {
                    return None;
                }
                let stripped = line
                    .trim_start_matches(|c: char| {
                        c == '•' || c == '-' || c == '*' || c == '.' || c.is_ascii_digit() || c == ' '
                    })
                    .trim();
                if stripped.chars().count() > 10 {
                    Some(stripped.to_string())
                } else {
                    None
                }
            })
            .take(10)
            .collect()
    }

    /// Question lines from a generated response: must contain `?`, be longer
    /// than 10 chars, distinct, in output order.
    pub fn parse_questions(&self, text: &str) -> Vec<String> {
        let mut seen = Vec::new();
        for line in text.lines() {
            let stripped = line
                .trim()
                .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == '-' || c == ' ')
                .trim();
            if stripped.contains('?')
                && stripped.chars().count() > 10
                && !seen.contains(&stripped.to_string())
            {
                seen.push(stripped.to_string());
            }
        }
        seen
    }

    /// Generic suggestions used when the model output yields no parseable
    /// question.
    pub fn fallback_questions(&self) -> Vec<String> {
        vec![
            "What are the main findings of this document?".to_string(),
            "What methodology was used in this research?".to_string(),
            "What are the practical applications mentioned?".to_string(),
            "What limitations or future work are discussed?".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::retrieval_service::RetrievedChunk;
    use crate::domain::entities::{Document, DocumentChunk};
    use crate::domain::value_objects::{DocumentMetadata, DocumentStatus};
    use chrono::Utc;

    fn document() -> Document {
        let now = Utc::now();
        Document::from_parts(
            4,
            "study.pdf".to_string(),
            "/uploads/x".to_string(),
            100,
            None,
            DocumentMetadata::new()
                .with_title(Some("A Study".to_string()))
                .with_authors(Some("J. Doe".to_string())),
            DocumentStatus::Ready,
            Some(3),
            now,
            now,
        )
    }

    fn chunk(document_id: i32, page: i32, score: f32, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            chunk: DocumentChunk::new(document_id, 0, page, content.to_string()),
            distance: 2.0 * (1.0 - score),
            similarity_score: score,
        }
    }

    fn stored(chunk_index: i32, content: &str) -> StoredChunk {
        StoredChunk {
            document_id: 1,
            chunk_index,
            page_number: 1,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_pack_context_stops_at_budget() {
        let builder = PromptBuilder::new();
        let chunks = vec![stored(0, "aaaaa"), stored(1, "bbbbb"), stored(2, "ccccc")];

        let (content, packed) = builder.pack_context(&chunks, 12);

        assert_eq!(content, "aaaaa\n\nbbbbb");
        assert_eq!(packed, 2);
    }

    #[test]
    fn test_pack_context_budget_counts_characters_not_bytes() {
        let builder = PromptBuilder::new();
        // Greek letters are two bytes each; a byte budget would stop early.
        let chunks = vec![stored(0, "ααααα"), stored(1, "βββ")];

        let (content, packed) = builder.pack_context(&chunks, 10);

        assert_eq!(packed, 2);
        assert!(content.ends_with("βββ"));
    }

    #[test]
    fn test_pack_context_always_takes_first_chunk() {
        let builder = PromptBuilder::new();
        let chunks = vec![stored(0, "a much longer chunk than the budget allows")];

        let (_, packed) = builder.pack_context(&chunks, 5);
        assert_eq!(packed, 1);
    }

    #[test]
    fn test_format_context_tags_provenance() {
        let builder = PromptBuilder::new();
        let context = builder.format_context(&[chunk(4, 2, 0.85, "The method uses transformers.")]);

        assert!(context.contains("[Document 4, Page 2, Relevance: 0.85]"));
        assert!(context.contains("The method uses transformers."));
    }

    #[test]
    fn test_format_context_empty() {
        let builder = PromptBuilder::new();
        assert_eq!(builder.format_context(&[]), "No relevant context found.");
    }

    #[test]
    fn test_answer_prompt_contains_context_and_question() {
        let builder = PromptBuilder::new();
        let prompt = builder.answer_prompt("CONTEXT HERE", "What was measured?");

        assert!(prompt.contains("CONTEXT HERE"));
        assert!(prompt.contains("Task: Answer: What was measured?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{task}"));
    }

    #[test]
    fn test_summary_prompt_includes_document_metadata() {
        let builder = PromptBuilder::new();
        let prompt = builder.summary_prompt(&document(), "Body text.");

        assert!(prompt.contains("Document: A Study"));
        assert!(prompt.contains("Authors: J. Doe"));
        assert!(prompt.contains("Summarize the document"));
    }

    #[test]
    fn test_preprocess_query_without_history() {
        let builder = PromptBuilder::new();
        assert_eq!(
            builder.preprocess_query("  What is this?  ", None, 6),
            "What is this?"
        );
    }

    #[test]
    fn test_preprocess_query_bounds_history_oldest_first() {
        let builder = PromptBuilder::new();
        let history: Vec<ChatTurn> = (0..10)
            .map(|i| ChatTurn {
                role: "user".to_string(),
                content: format!("q{}", i),
            })
            .collect();

        let query = builder.preprocess_query("latest?", Some(&history), 3);
        assert!(!query.contains("q6"));
        assert!(query.contains("q7"));
        assert!(query.contains("q9"));
        assert!(query.ends_with("Current question: latest?"));
    }

    #[test]
    fn test_preprocess_query_truncates_assistant_turns() {
        let builder = PromptBuilder::new();
        let history = vec![ChatTurn {
            role: "assistant".to_string(),
            content: "a".repeat(500),
        }];

        let query = builder.preprocess_query("next?", Some(&history), 6);
        assert!(query.contains(&format!("Previous answer: {}...", "a".repeat(100))));
        assert!(!query.contains(&"a".repeat(101)));
    }

    #[test]
    fn test_extract_bullet_points() {
        let builder = PromptBuilder::new();
        let text = "Summary:\n\
            - The study introduces a novel architecture\n\
            * Results improve on three benchmarks\n\
            1. Limitations include dataset size\n\
            - tiny\n\
            Plain sentence that is not a bullet.";

        let points = builder.extract_bullet_points(text);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], "The study introduces a novel architecture");
        assert_eq!(points[2], "Limitations include dataset size");
    }

    #[test]
    fn test_parse_questions_filters_and_dedupes() {
        let builder = PromptBuilder::new();
        let text = "1. What methodology was applied?\n\
            Not a question line\n\
            2. What methodology was applied?\n\
            3. How were baselines chosen?\n\
            Why?";

        let questions = builder.parse_questions(text);
        assert_eq!(
            questions,
            vec![
                "What methodology was applied?".to_string(),
                "How were baselines chosen?".to_string()
            ]
        );
    }

    #[test]
    fn test_fallback_questions_are_distinct_and_nonempty() {
        let builder = PromptBuilder::new();
        let questions = builder.fallback_questions();
        assert_eq!(questions.len(), 4);
        for q in &questions {
            assert!(!q.is_empty());
        }
    }
}
