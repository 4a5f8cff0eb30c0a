use async_trait::async_trait;

#[derive(Debug)]
pub enum EmbeddingProviderError {
    NetworkError(String),
    ApiError(String),
    InvalidInput(String),
    Timeout(String),
}

impl std::fmt::Display for EmbeddingProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProviderError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            EmbeddingProviderError::ApiError(msg) => write!(f, "API error: {}", msg),
            EmbeddingProviderError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EmbeddingProviderError::Timeout(msg) => write!(f, "Embedding request timed out: {}", msg),
        }
    }
}

impl std::error::Error for EmbeddingProviderError {}

impl EmbeddingProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, EmbeddingProviderError::Timeout(_))
    }
}

/// Text-to-vector encoding (a SentenceTransformers model behind an HTTP
/// endpoint in production). Requests are read-only and may be retried.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingProviderError>;

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingProviderError> {
        let mut embeddings = self.embed(std::slice::from_ref(&text.to_string())).await?;
        embeddings.pop().ok_or_else(|| {
            EmbeddingProviderError::ApiError("Empty embedding response".to_string())
        })
    }

    async fn health_check(&self) -> bool;

    fn model_name(&self) -> &str;
}
