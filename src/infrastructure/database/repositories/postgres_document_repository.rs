use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};
use crate::domain::value_objects::DocumentStatus;
use crate::infrastructure::database::connection::{DbPool, get_connection_from_pool};
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::documents::dsl::*;

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn create(&self, new_document: NewDocument) -> Result<Document, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let new_model = NewDocumentModel::from(&new_document);

        let inserted: DocumentModel = diesel::insert_into(documents)
            .values(&new_model)
            .get_result(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Document::try_from(inserted).map_err(DocumentRepositoryError::ValidationError)
    }

    async fn find_by_id(&self, document_id: i32) -> Result<Option<Document>, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let result = documents
            .find(document_id)
            .first::<DocumentModel>(&mut conn)
            .optional()
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        match result {
            Some(model) => {
                let document =
                    Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let models = documents
            .order((uploaded_at.desc(), id.desc()))
            .offset(offset)
            .limit(limit)
            .load::<DocumentModel>(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let mut results = Vec::with_capacity(models.len());
        for model in models {
            let document =
                Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)?;
            results.push(document);
        }

        Ok(results)
    }

    async fn count(&self) -> Result<i64, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        documents
            .count()
            .get_result(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
    }

    async fn update_status(
        &self,
        document_id: i32,
        new_status: DocumentStatus,
    ) -> Result<(), DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let updated_count = diesel::update(documents.find(document_id))
            .set((
                status.eq(new_status.as_str()),
                error_message.eq(new_status.error_message().map(|s| s.to_string())),
                updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        if updated_count == 0 {
            return Err(DocumentRepositoryError::NotFound(document_id));
        }
        Ok(())
    }

    async fn update_chunk_count(
        &self,
        document_id: i32,
        chunks: i32,
    ) -> Result<(), DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let updated_count = diesel::update(documents.find(document_id))
            .set((chunk_count.eq(Some(chunks)), updated_at.eq(Utc::now())))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        if updated_count == 0 {
            return Err(DocumentRepositoryError::NotFound(document_id));
        }
        Ok(())
    }

    async fn delete(&self, document_id: i32) -> Result<bool, DocumentRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        let deleted_count = diesel::delete(documents.find(document_id))
            .execute(&mut conn)
            .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;

        Ok(deleted_count > 0)
    }
}
