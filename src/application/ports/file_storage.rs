use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug)]
pub enum FileStorageError {
    FileNotFound(String),
    IoError(String),
}

impl std::fmt::Display for FileStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStorageError::FileNotFound(path) => write!(f, "File not found: {}", path),
            FileStorageError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for FileStorageError {}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub path: String,
    pub size: u64,
}

/// Durable storage for the raw uploaded PDFs, keyed by an opaque id.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store_file(&self, data: &[u8], file_name: &str)
    -> Result<StoredFile, FileStorageError>;

    async fn retrieve_file(&self, file_id: Uuid) -> Result<Vec<u8>, FileStorageError>;

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError>;

    async fn health_check(&self) -> bool;
}
