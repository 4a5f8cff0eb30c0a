use std::sync::Arc;

use crate::application::ports::embedding_provider::EmbeddingProvider;
use crate::application::ports::vector_index::{ScoredChunk, VectorIndex};
use crate::domain::entities::DocumentChunk;
use crate::domain::repositories::DocumentRepository;

#[derive(Debug)]
pub enum RetrievalError {
    EmbeddingError { message: String, timed_out: bool },
    IndexError { message: String, timed_out: bool },
    RepositoryError(String),
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalError::EmbeddingError { message, .. } => {
                write!(f, "Embedding error: {}", message)
            }
            RetrievalError::IndexError { message, .. } => {
                write!(f, "Vector index error: {}", message)
            }
            RetrievalError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalError {}

/// A chunk selected as context for generation, carrying both the raw
/// distance and the derived similarity score surfaced to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub chunk: DocumentChunk,
    pub distance: f32,
    pub similarity_score: f32,
}

impl RetrievedChunk {
    pub fn document_id(&self) -> i32 {
        self.chunk.document_id()
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk.chunk_index()
    }

    pub fn page_number(&self) -> i32 {
        self.chunk.page_number()
    }

    pub fn content(&self) -> &str {
        self.chunk.content()
    }

    pub fn content_preview(&self) -> String {
        self.chunk.content_preview()
    }
}

/// Similarity retrieval: encode the query, search the index, filter by
/// distance, and rank deterministically. Unscoped searches additionally
/// drop chunks whose document no longer exists or is not ready, so every
/// source surfaced to a caller references a live document.
pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_index: Arc<dyn VectorIndex>,
    document_repository: Arc<dyn DocumentRepository>,
    max_distance: f32,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_index: Arc<dyn VectorIndex>,
        document_repository: Arc<dyn DocumentRepository>,
        max_distance: f32,
    ) -> Self {
        Self {
            embedding_provider,
            vector_index,
            document_repository,
            max_distance,
        }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        document_id: Option<i32>,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let query_embedding = self
            .embedding_provider
            .embed_one(query)
            .await
            .map_err(|e| RetrievalError::EmbeddingError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            })?;

        let candidates = self
            .vector_index
            .search(&query_embedding, k, document_id)
            .await
            .map_err(|e| RetrievalError::IndexError {
                timed_out: e.is_timeout(),
                message: e.to_string(),
            })?;

        let mut selected = rank(candidates, self.max_distance);

        if document_id.is_none() {
            selected = self.filter_to_live_documents(selected).await?;
        }

        Ok(selected)
    }

    /// Unscoped retrieval may race with deletes; sources must never point at
    /// a document the store no longer has (or one that is not ready).
    async fn filter_to_live_documents(
        &self,
        chunks: Vec<RetrievedChunk>,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let mut live = Vec::with_capacity(chunks.len());
        let mut known: Vec<(i32, bool)> = Vec::new();

        for chunk in chunks {
            let ready = match known.iter().find(|(id, _)| *id == chunk.document_id()) {
                Some((_, ready)) => *ready,
                None => {
                    let ready = self
                        .document_repository
                        .find_by_id(chunk.document_id())
                        .await
                        .map_err(|e| RetrievalError::RepositoryError(e.to_string()))?
                        .map(|doc| doc.is_ready())
                        .unwrap_or(false);
                    known.push((chunk.document_id(), ready));
                    ready
                }
            };
            if ready {
                live.push(chunk);
            }
        }

        Ok(live)
    }
}

/// Distance filter plus deterministic ordering. Chunks past the distance
/// ceiling are dropped unless that removes everything, in which case the
/// top 3 raw results are kept. Ties on distance resolve by chunk sequence.
pub fn rank(candidates: Vec<ScoredChunk>, max_distance: f32) -> Vec<RetrievedChunk> {
    let mut kept: Vec<&ScoredChunk> = candidates
        .iter()
        .filter(|c| c.distance <= max_distance)
        .collect();

    if kept.is_empty() {
        kept = candidates.iter().take(3).collect();
    }

    let mut ranked: Vec<RetrievedChunk> = kept
        .into_iter()
        .map(|c| RetrievedChunk {
            chunk: DocumentChunk::new(c.document_id, c.chunk_index, c.page_number, c.content.clone()),
            distance: c.distance,
            similarity_score: 1.0 - c.distance / 2.0,
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.chunk_index().cmp(&b.chunk_index()))
    });

    ranked
}
