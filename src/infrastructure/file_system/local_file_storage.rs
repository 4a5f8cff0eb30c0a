use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::file_storage::{FileStorage, FileStorageError, StoredFile};

/// Uploaded PDFs on the local filesystem, one file per upload, named by a
/// generated id so repeated uploads of the same paper never collide.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    fn get_file_path(&self, file_id: Uuid) -> PathBuf {
        self.base_path.join(format!("{}.pdf", file_id))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(
        &self,
        data: &[u8],
        _file_name: &str,
    ) -> Result<StoredFile, FileStorageError> {
        self.ensure_directory_exists().await?;

        let file_id = Uuid::new_v4();
        let file_path = self.get_file_path(file_id);

        fs::write(&file_path, data)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?;

        Ok(StoredFile {
            id: file_id,
            path: file_path.to_string_lossy().to_string(),
            size: data.len() as u64,
        })
    }

    async fn retrieve_file(&self, file_id: Uuid) -> Result<Vec<u8>, FileStorageError> {
        let file_path = self.get_file_path(file_id);

        if !file_path.exists() {
            return Err(FileStorageError::FileNotFound(file_id.to_string()));
        }

        fs::read(&file_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError> {
        let file_path = self.get_file_path(file_id);

        if !file_path.exists() {
            return Ok(false);
        }

        fs::remove_file(&file_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?;

        Ok(true)
    }

    async fn health_check(&self) -> bool {
        self.ensure_directory_exists().await.is_ok()
    }
}
