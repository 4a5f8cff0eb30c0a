use async_trait::async_trait;

#[derive(Debug)]
pub enum CompletionError {
    NetworkError(String),
    ApiError(String),
    EmptyResponse,
    Timeout(String),
}

impl std::fmt::Display for CompletionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompletionError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            CompletionError::ApiError(msg) => write!(f, "Completion API error: {}", msg),
            CompletionError::EmptyResponse => write!(f, "Completion response contained no choices"),
            CompletionError::Timeout(msg) => write!(f, "Completion request timed out: {}", msg),
        }
    }
}

impl std::error::Error for CompletionError {}

impl CompletionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, CompletionError::Timeout(_))
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub total_tokens: u32,
}

/// Text generation behind a hosted chat-completions API. Calls are never
/// auto-retried.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, CompletionError>;

    async fn health_check(&self) -> bool;

    fn model_name(&self) -> &str;
}
