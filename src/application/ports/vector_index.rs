use async_trait::async_trait;

#[derive(Debug)]
pub enum VectorIndexError {
    ConnectionError(String),
    ApiError(String),
    ParseError(String),
    Timeout(String),
}

impl std::fmt::Display for VectorIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorIndexError::ConnectionError(msg) => {
                write!(f, "Vector store connection error: {}", msg)
            }
            VectorIndexError::ApiError(msg) => write!(f, "Vector store API error: {}", msg),
            VectorIndexError::ParseError(msg) => write!(f, "Vector store parse error: {}", msg),
            VectorIndexError::Timeout(msg) => write!(f, "Vector store request timed out: {}", msg),
        }
    }
}

impl std::error::Error for VectorIndexError {}

impl VectorIndexError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, VectorIndexError::Timeout(_))
    }
}

/// A chunk ready for indexing: text plus its embedding vector.
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk_index: i32,
    pub page_number: i32,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A chunk returned by similarity search, with its cosine distance to the
/// query (smaller is closer).
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub document_id: i32,
    pub chunk_index: i32,
    pub page_number: i32,
    pub content: String,
    pub distance: f32,
}

/// A chunk fetched without a query (summary context assembly).
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub document_id: i32,
    pub chunk_index: i32,
    pub page_number: i32,
    pub content: String,
}

/// External similarity index over document chunks. Entries reference
/// documents by id and never own them.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index chunks for a document, tagged with document id and sequence
    /// number. Not idempotent: the caller must not retry on failure.
    async fn index_chunks(
        &self,
        document_id: i32,
        chunks: &[EmbeddedChunk],
    ) -> Result<(), VectorIndexError>;

    /// Top-k nearest chunks, optionally scoped to one document.
    async fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
        document_id: Option<i32>,
    ) -> Result<Vec<ScoredChunk>, VectorIndexError>;

    /// All chunks of one document, up to `limit`, in no particular order
    /// (callers sort by chunk index).
    async fn fetch_document_chunks(
        &self,
        document_id: i32,
        limit: usize,
    ) -> Result<Vec<StoredChunk>, VectorIndexError>;

    /// Drop every chunk indexed for the document.
    async fn delete_document(&self, document_id: i32) -> Result<(), VectorIndexError>;

    async fn health_check(&self) -> bool;
}
