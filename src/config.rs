use std::env;

/// Tunables for the RAG orchestrator. Defaults match the behavior the
/// frontend was built against; every value can be overridden through the
/// environment.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Chunks retrieved per chat query.
    pub max_chunks: usize,
    /// Cosine-distance ceiling for retrieved chunks.
    pub max_distance: f32,
    /// Completion generation bounds.
    pub primary_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Conversation-history entries folded into a chat query, oldest dropped first.
    pub max_history_turns: usize,
    /// Character budget for summary/question context packing.
    pub max_context_chars: usize,
    /// Chunking window.
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_chunks: 5,
            max_distance: 1.5,
            primary_model: "moonshotai/kimi-k2:free".to_string(),
            max_tokens: 1000,
            temperature: 0.3,
            max_history_turns: 6,
            max_context_chars: 12_000,
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

impl RagConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_chunks: env_parse("RAG_MAX_CHUNKS", defaults.max_chunks),
            max_distance: env_parse("RAG_MAX_DISTANCE", defaults.max_distance),
            primary_model: env::var("RAG_PRIMARY_MODEL").unwrap_or(defaults.primary_model),
            max_tokens: env_parse("RAG_MAX_TOKENS", defaults.max_tokens),
            temperature: env_parse("RAG_TEMPERATURE", defaults.temperature),
            max_history_turns: env_parse("RAG_MAX_HISTORY_TURNS", defaults.max_history_turns),
            max_context_chars: env_parse("RAG_MAX_CONTEXT_CHARS", defaults.max_context_chars),
            chunk_size: env_parse("RAG_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: env_parse("RAG_CHUNK_OVERLAP", defaults.chunk_overlap),
        }
    }
}

/// Limits enforced by the document store API.
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Upload size ceiling in bytes.
    pub max_upload_bytes: usize,
    /// Cap applied to the `limit` query parameter on listings.
    pub max_page_size: i64,
    pub default_page_size: i64,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
            max_page_size: 100,
            default_page_size: 50,
        }
    }
}

impl DocumentStoreConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            max_page_size: env_parse("MAX_PAGE_SIZE", defaults.max_page_size),
            default_page_size: env_parse("DEFAULT_PAGE_SIZE", defaults.default_page_size),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", Self::default().port),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
